use log::{debug, error, info};
use tokio::sync::Mutex;

use crate::{
    Clock, CreateError, ExerciseLogEntry, ExerciseLogRepository, ExerciseLogService, Goal, GoalID,
    GoalRepository, GoalService, GoalUpdate, MuscleGroup, MuscleGroupID, MuscleGroupRepository,
    MuscleGroupService, NewExerciseLogEntry, NewGoal, ReadError, Recommendation,
    RecommendationRepository, RecommendationService, SystemClock, UpdateError, ValidationError,
    Window, evaluate, recent_entries,
};

/// Entry point for all operations on the exercise log, goals and recommendations.
///
/// Appending to the exercise log and regenerating the recommendations share one write lock, so
/// that a regeneration never interleaves with another one and a logged exercise is reflected in
/// the recommendations as soon as `log_exercise` returns.
pub struct Service<R, C = SystemClock> {
    repository: R,
    clock: C,
    write_lock: Mutex<()>,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R, C: Clock> Service<R, C> {
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::Unavailable) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: MuscleGroupRepository, C: Clock> Service<R, C> {
    async fn validate_muscle_group(&self, id: MuscleGroupID) -> Result<(), CreateError> {
        let muscle_groups = self.get_muscle_groups().await?;
        if muscle_groups.iter().any(|g| g.id == id) {
            Ok(())
        } else {
            debug!("rejected reference to unknown muscle group {id}");
            Err(ValidationError::UnknownMuscleGroup(id).into())
        }
    }
}

impl<R, C> Service<R, C>
where
    R: MuscleGroupRepository + ExerciseLogRepository + RecommendationRepository,
    C: Clock,
{
    /// Must only be called while holding the write lock.
    async fn regenerate(&self) -> Result<Vec<Recommendation>, UpdateError> {
        let now = self.clock.now();
        let catalog = self.repository.read_muscle_groups().await?;
        let recent = recent_entries(
            self.repository
                .read_exercise_log_since(Window::WEEK.start(now))
                .await?,
            now,
            Window::WEEK,
        );
        let recommendations = evaluate(&recent, &catalog, now);
        debug!(
            "regenerating {} recommendations from {} recent exercise log entries",
            recommendations.len(),
            recent.len()
        );
        self.repository
            .replace_recommendations(recommendations)
            .await
    }
}

impl<R: MuscleGroupRepository, C: Clock> MuscleGroupService for Service<R, C> {
    async fn get_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError> {
        log_on_error!(
            self.repository.read_muscle_groups(),
            ReadError,
            "get",
            "muscle groups"
        )
    }
}

impl<R, C> ExerciseLogService for Service<R, C>
where
    R: MuscleGroupRepository + ExerciseLogRepository + RecommendationRepository,
    C: Clock,
{
    async fn get_exercise_log(&self) -> Result<Vec<ExerciseLogEntry>, ReadError> {
        log_on_error!(
            self.repository.read_exercise_log(),
            ReadError,
            "get",
            "exercise log"
        )
    }

    async fn get_exercise_log_for_muscle_group(
        &self,
        muscle_group_id: MuscleGroupID,
    ) -> Result<Vec<ExerciseLogEntry>, ReadError> {
        log_on_error!(
            self.repository
                .read_exercise_log_for_muscle_group(muscle_group_id),
            ReadError,
            "get",
            "exercise log"
        )
    }

    async fn get_recent_exercise_log(
        &self,
        window: Window,
    ) -> Result<Vec<ExerciseLogEntry>, ReadError> {
        let now = self.clock.now();
        let entries = log_on_error!(
            self.repository.read_exercise_log_since(window.start(now)),
            ReadError,
            "get",
            "recent exercise log"
        )?;
        Ok(recent_entries(entries, now, window))
    }

    async fn log_exercise(
        &self,
        entry: NewExerciseLogEntry,
    ) -> Result<ExerciseLogEntry, CreateError> {
        self.validate_muscle_group(entry.muscle_group_id).await?;

        let _guard = self.write_lock.lock().await;
        let entry = log_on_error!(
            self.repository
                .create_exercise_log_entry(entry, self.clock.now()),
            CreateError,
            "create",
            "exercise log entry"
        )?;
        info!(
            "logged {} ({} x {}) for muscle group {}",
            entry.name, entry.sets, entry.reps, entry.muscle_group_id
        );
        log_on_error!(
            self.regenerate(),
            UpdateError,
            "regenerate",
            "recommendations"
        )?;
        Ok(entry)
    }
}

impl<R, C> RecommendationService for Service<R, C>
where
    R: MuscleGroupRepository + ExerciseLogRepository + RecommendationRepository,
    C: Clock,
{
    async fn get_recommendations(&self) -> Result<Vec<Recommendation>, ReadError> {
        log_on_error!(
            self.repository.read_recommendations(),
            ReadError,
            "get",
            "recommendations"
        )
    }

    async fn regenerate_recommendations(&self) -> Result<Vec<Recommendation>, UpdateError> {
        let _guard = self.write_lock.lock().await;
        log_on_error!(
            self.regenerate(),
            UpdateError,
            "regenerate",
            "recommendations"
        )
    }
}

impl<R, C> GoalService for Service<R, C>
where
    R: MuscleGroupRepository + GoalRepository,
    C: Clock,
{
    async fn get_goals(&self) -> Result<Vec<Goal>, ReadError> {
        log_on_error!(self.repository.read_goals(), ReadError, "get", "goals")
    }

    async fn create_goal(&self, goal: NewGoal) -> Result<Goal, CreateError> {
        self.validate_muscle_group(goal.muscle_group_id).await?;
        log_on_error!(
            self.repository.create_goal(goal, self.clock.now()),
            CreateError,
            "create",
            "goal"
        )
    }

    async fn modify_goal(&self, id: GoalID, update: GoalUpdate) -> Result<Goal, UpdateError> {
        log_on_error!(
            self.repository.modify_goal(id, update),
            UpdateError,
            "modify",
            "goal"
        )
    }
}
