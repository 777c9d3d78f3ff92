use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use log::trace;
use restday_domain as domain;

/// Process-local storage for the catalog, the exercise log, the goals and the current set of
/// recommendations.
///
/// Each collection is guarded by its own lock, which is only held for the duration of a single
/// repository call.
pub struct InMemory {
    muscle_groups: Vec<domain::MuscleGroup>,
    exercise_log: Mutex<Table<domain::ExerciseLogEntry>>,
    goals: Mutex<Table<domain::Goal>>,
    recommendations: Mutex<Vec<domain::Recommendation>>,
}

/// Rows ordered by their monotonically assigned id.
struct Table<T> {
    rows: BTreeMap<u32, T>,
    next_id: u32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn insert_with(&mut self, row: impl FnOnce(u32) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(row(id))
    }
}

impl InMemory {
    #[must_use]
    pub fn new(muscle_groups: Vec<domain::MuscleGroup>) -> Self {
        Self {
            muscle_groups,
            exercise_log: Mutex::new(Table::default()),
            goals: Mutex::new(Table::default()),
            recommendations: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new(domain::default_catalog())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, domain::StorageError> {
    mutex.lock().map_err(|_| domain::StorageError::Unavailable)
}

impl domain::MuscleGroupRepository for InMemory {
    async fn read_muscle_groups(&self) -> Result<Vec<domain::MuscleGroup>, domain::ReadError> {
        Ok(self.muscle_groups.clone())
    }
}

impl domain::ExerciseLogRepository for InMemory {
    async fn read_exercise_log(&self) -> Result<Vec<domain::ExerciseLogEntry>, domain::ReadError> {
        Ok(lock(&self.exercise_log)?.rows.values().cloned().collect())
    }

    async fn read_exercise_log_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<domain::ExerciseLogEntry>, domain::ReadError> {
        Ok(lock(&self.exercise_log)?
            .rows
            .values()
            .filter(|e| e.logged_at >= since)
            .cloned()
            .collect())
    }

    async fn read_exercise_log_for_muscle_group(
        &self,
        muscle_group_id: domain::MuscleGroupID,
    ) -> Result<Vec<domain::ExerciseLogEntry>, domain::ReadError> {
        Ok(lock(&self.exercise_log)?
            .rows
            .values()
            .filter(|e| e.muscle_group_id == muscle_group_id)
            .cloned()
            .collect())
    }

    async fn create_exercise_log_entry(
        &self,
        entry: domain::NewExerciseLogEntry,
        logged_at: DateTime<Utc>,
    ) -> Result<domain::ExerciseLogEntry, domain::CreateError> {
        let mut exercise_log = lock(&self.exercise_log)?;
        let entry = exercise_log.insert_with(|id| domain::ExerciseLogEntry {
            id: id.into(),
            name: entry.name,
            muscle_group_id: entry.muscle_group_id,
            sets: entry.sets,
            reps: entry.reps,
            logged_at,
        });
        trace!("stored exercise log entry {}", entry.id);
        Ok(entry.clone())
    }
}

impl domain::RecommendationRepository for InMemory {
    async fn read_recommendations(
        &self,
    ) -> Result<Vec<domain::Recommendation>, domain::ReadError> {
        Ok(lock(&self.recommendations)?.clone())
    }

    async fn replace_recommendations(
        &self,
        recommendations: Vec<domain::NewRecommendation>,
    ) -> Result<Vec<domain::Recommendation>, domain::UpdateError> {
        let recommendations = recommendations
            .into_iter()
            .zip(1_u32..)
            .map(|(r, id)| domain::Recommendation {
                id: domain::RecommendationID::from(id),
                muscle_group_id: r.muscle_group_id,
                priority: r.priority,
                reason: r.reason,
            })
            .collect::<Vec<_>>();
        *lock(&self.recommendations)? = recommendations.clone();
        Ok(recommendations)
    }
}

impl domain::GoalRepository for InMemory {
    async fn read_goals(&self) -> Result<Vec<domain::Goal>, domain::ReadError> {
        Ok(lock(&self.goals)?.rows.values().cloned().collect())
    }

    async fn create_goal(
        &self,
        goal: domain::NewGoal,
        created_at: DateTime<Utc>,
    ) -> Result<domain::Goal, domain::CreateError> {
        let mut goals = lock(&self.goals)?;
        let goal = goals.insert_with(|id| domain::Goal {
            id: id.into(),
            muscle_group_id: goal.muscle_group_id,
            kind: goal.kind,
            description: goal.description,
            target_value: goal.target_value,
            current_value: 0,
            deadline: goal.deadline,
            created_at,
        });
        Ok(goal.clone())
    }

    async fn modify_goal(
        &self,
        id: domain::GoalID,
        update: domain::GoalUpdate,
    ) -> Result<domain::Goal, domain::UpdateError> {
        let mut goals = lock(&self.goals)?;
        let goal = goals
            .rows
            .get_mut(&*id)
            .ok_or(domain::UpdateError::NotFound)?;
        goal.apply(update);
        Ok(goal.clone())
    }
}
