use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};

use crate::{CreateError, MuscleGroupID, ReadError, UpdateError, ValidationError};

#[allow(async_fn_in_trait)]
pub trait GoalService {
    async fn get_goals(&self) -> Result<Vec<Goal>, ReadError>;
    async fn create_goal(&self, goal: NewGoal) -> Result<Goal, CreateError>;
    async fn modify_goal(&self, id: GoalID, update: GoalUpdate) -> Result<Goal, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait GoalRepository {
    async fn read_goals(&self) -> Result<Vec<Goal>, ReadError>;
    async fn create_goal(
        &self,
        goal: NewGoal,
        created_at: DateTime<Utc>,
    ) -> Result<Goal, CreateError>;
    async fn modify_goal(&self, id: GoalID, update: GoalUpdate) -> Result<Goal, UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: GoalID,
    pub muscle_group_id: MuscleGroupID,
    pub kind: GoalKind,
    pub description: String,
    pub target_value: u32,
    pub current_value: u32,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Share of the target reached, in percent, capped at 100.
    #[must_use]
    pub fn progress(&self) -> u32 {
        if self.target_value == 0 {
            return 100;
        }
        let percent = u64::from(self.current_value) * 100 / u64::from(self.target_value);
        u32::try_from(percent.min(100)).unwrap_or(100)
    }

    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|d| d < now) && self.current_value < self.target_value
    }

    pub fn apply(&mut self, update: GoalUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(target_value) = update.target_value {
            self.target_value = target_value;
        }
        if let Some(current_value) = update.current_value {
            self.current_value = current_value;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoalID(u32);

impl From<u32> for GoalID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum GoalKind {
    #[display("reps")]
    Reps,
    #[display("weight")]
    Weight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub muscle_group_id: MuscleGroupID,
    pub kind: GoalKind,
    pub description: String,
    pub target_value: u32,
    pub deadline: Option<DateTime<Utc>>,
}

impl NewGoal {
    pub fn new(
        muscle_group_id: MuscleGroupID,
        kind: GoalKind,
        description: &str,
        target_value: i64,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            muscle_group_id,
            kind,
            description: validate_description(description)?,
            target_value: validate_target_value(target_value)?,
            deadline,
        })
    }
}

/// Changes to a goal. `None` leaves a field untouched; a `deadline` of `Some(None)` removes it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GoalUpdate {
    pub description: Option<String>,
    pub target_value: Option<u32>,
    pub current_value: Option<u32>,
    pub deadline: Option<Option<DateTime<Utc>>>,
}

impl GoalUpdate {
    pub fn new(
        description: Option<&str>,
        target_value: Option<i64>,
        current_value: Option<i64>,
        deadline: Option<Option<DateTime<Utc>>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            description: description.map(validate_description).transpose()?,
            target_value: target_value.map(validate_target_value).transpose()?,
            current_value: current_value
                .map(|v| u32::try_from(v).map_err(|_| ValidationError::InvalidCurrentValue(v)))
                .transpose()?,
            deadline,
        })
    }
}

fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

fn validate_target_value(value: i64) -> Result<u32, ValidationError> {
    match u32::try_from(value) {
        Ok(target) if target > 0 => Ok(target),
        _ => Err(ValidationError::InvalidTargetValue(value)),
    }
}
