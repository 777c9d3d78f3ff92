//! Request and response bodies of the JSON interface.

use chrono::{DateTime, Utc};
use restday_domain as domain;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroup {
    pub id: u32,
    pub name: String,
    pub rest_days: u32,
}

impl From<&domain::MuscleGroup> for MuscleGroup {
    fn from(value: &domain::MuscleGroup) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            rest_days: *value.rest_days,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogExerciseRequest {
    pub name: String,
    pub muscle_group_id: u32,
    pub sets: i64,
    pub reps: i64,
}

impl TryFrom<LogExerciseRequest> for domain::NewExerciseLogEntry {
    type Error = domain::ValidationError;

    fn try_from(value: LogExerciseRequest) -> Result<Self, Self::Error> {
        domain::NewExerciseLogEntry::new(
            &value.name,
            value.muscle_group_id.into(),
            value.sets,
            value.reps,
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLogEntry {
    pub id: u32,
    pub name: String,
    pub muscle_group_id: u32,
    pub sets: u32,
    pub reps: u32,
    pub logged_at: DateTime<Utc>,
}

impl From<&domain::ExerciseLogEntry> for ExerciseLogEntry {
    fn from(value: &domain::ExerciseLogEntry) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            muscle_group_id: *value.muscle_group_id,
            sets: *value.sets,
            reps: *value.reps,
            logged_at: value.logged_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: u32,
    pub muscle_group_id: u32,
    pub priority: u8,
    pub reason: String,
}

impl From<&domain::Recommendation> for Recommendation {
    fn from(value: &domain::Recommendation) -> Self {
        Self {
            id: *value.id,
            muscle_group_id: *value.muscle_group_id,
            priority: *value.priority,
            reason: value.reason.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Reps,
    Weight,
}

impl From<domain::GoalKind> for GoalKind {
    fn from(value: domain::GoalKind) -> Self {
        match value {
            domain::GoalKind::Reps => GoalKind::Reps,
            domain::GoalKind::Weight => GoalKind::Weight,
        }
    }
}

impl From<GoalKind> for domain::GoalKind {
    fn from(value: GoalKind) -> Self {
        match value {
            GoalKind::Reps => domain::GoalKind::Reps,
            GoalKind::Weight => domain::GoalKind::Weight,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub muscle_group_id: u32,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub description: String,
    pub target_value: i64,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl TryFrom<CreateGoalRequest> for domain::NewGoal {
    type Error = domain::ValidationError;

    fn try_from(value: CreateGoalRequest) -> Result<Self, Self::Error> {
        domain::NewGoal::new(
            value.muscle_group_id.into(),
            value.kind.into(),
            &value.description,
            value.target_value,
            value.deadline,
        )
    }
}

/// Partial update of a goal. An explicit `"deadline": null` removes the deadline, an absent
/// `deadline` keeps it.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_value: Option<i64>,
    #[serde(default)]
    pub current_value: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub deadline: Option<Option<DateTime<Utc>>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateGoalRequest> for domain::GoalUpdate {
    type Error = domain::ValidationError;

    fn try_from(value: UpdateGoalRequest) -> Result<Self, Self::Error> {
        domain::GoalUpdate::new(
            value.description.as_deref(),
            value.target_value,
            value.current_value,
            value.deadline,
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u32,
    pub muscle_group_id: u32,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub description: String,
    pub target_value: u32,
    pub current_value: u32,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&domain::Goal> for Goal {
    fn from(value: &domain::Goal) -> Self {
        Self {
            id: *value.id,
            muscle_group_id: *value.muscle_group_id,
            kind: value.kind.into(),
            description: value.description.clone(),
            target_value: value.target_value,
            current_value: value.current_value,
            deadline: value.deadline,
            created_at: value.created_at,
        }
    }
}
