use chrono::{DateTime, Duration, Utc};
use derive_more::{Deref, Display};

use crate::{CreateError, MuscleGroupID, Name, ReadError, ValidationError};

#[allow(async_fn_in_trait)]
pub trait ExerciseLogService {
    async fn get_exercise_log(&self) -> Result<Vec<ExerciseLogEntry>, ReadError>;
    async fn get_exercise_log_for_muscle_group(
        &self,
        muscle_group_id: MuscleGroupID,
    ) -> Result<Vec<ExerciseLogEntry>, ReadError>;
    /// Entries of the trailing window, most recent first.
    async fn get_recent_exercise_log(
        &self,
        window: Window,
    ) -> Result<Vec<ExerciseLogEntry>, ReadError>;
    /// Appends an entry and regenerates the recommendations before returning.
    async fn log_exercise(&self, entry: NewExerciseLogEntry)
    -> Result<ExerciseLogEntry, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseLogRepository {
    async fn read_exercise_log(&self) -> Result<Vec<ExerciseLogEntry>, ReadError>;
    async fn read_exercise_log_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<ExerciseLogEntry>, ReadError>;
    async fn read_exercise_log_for_muscle_group(
        &self,
        muscle_group_id: MuscleGroupID,
    ) -> Result<Vec<ExerciseLogEntry>, ReadError>;
    async fn create_exercise_log_entry(
        &self,
        entry: NewExerciseLogEntry,
        logged_at: DateTime<Utc>,
    ) -> Result<ExerciseLogEntry, CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseLogEntry {
    pub id: ExerciseLogEntryID,
    pub name: Name,
    pub muscle_group_id: MuscleGroupID,
    pub sets: Sets,
    pub reps: Reps,
    pub logged_at: DateTime<Utc>,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseLogEntryID(u32);

impl From<u32> for ExerciseLogEntryID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A validated exercise that has not been logged yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExerciseLogEntry {
    pub name: Name,
    pub muscle_group_id: MuscleGroupID,
    pub sets: Sets,
    pub reps: Reps,
}

impl NewExerciseLogEntry {
    pub fn new(
        name: &str,
        muscle_group_id: MuscleGroupID,
        sets: i64,
        reps: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: Name::new(name)?,
            muscle_group_id,
            sets: Sets::new(sets)?,
            reps: Reps::new(reps)?,
        })
    }
}

#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u32::try_from(value) {
            Ok(sets) if sets > 0 => Ok(Self(sets)),
            _ => Err(ValidationError::InvalidSets(value)),
        }
    }
}

#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u32::try_from(value) {
            Ok(reps) if reps > 0 => Ok(Self(reps)),
            _ => Err(ValidationError::InvalidReps(value)),
        }
    }
}

/// Trailing span of whole days over which recent activity is considered.
#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Window(u32);

impl Window {
    pub const WEEK: Window = Window(7);

    pub fn new(days: i64) -> Result<Self, ValidationError> {
        match u32::try_from(days) {
            Ok(days) if days > 0 => Ok(Self(days)),
            _ => Err(ValidationError::InvalidWindow),
        }
    }

    /// Earliest instant inside the window. Saturates at the minimum representable time.
    #[must_use]
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.0))
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Keeps the entries logged within `window` before `now` and orders them by descending time.
///
/// Entries logged after `now` are kept.
#[must_use]
pub fn recent_entries(
    entries: Vec<ExerciseLogEntry>,
    now: DateTime<Utc>,
    window: Window,
) -> Vec<ExerciseLogEntry> {
    let start = window.start(now);
    let mut recent = entries
        .into_iter()
        .filter(|e| e.logged_at >= start)
        .collect::<Vec<_>>();
    recent.sort_by(|a, b| b.logged_at.cmp(&a.logged_at).then(b.id.cmp(&a.id)));
    recent
}
