use std::{fs, path::Path};

use anyhow::Context;
use chrono::{DateTime, Utc};
use log::info;
use restday_domain::{self as domain, ExerciseLogService, ManualClock, RecommendationService};
use restday_storage::{InMemory, json};
use serde::Deserialize;

/// Exercise log entry as stored in a replay file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEntry {
    pub name: String,
    pub muscle_group_id: u32,
    pub sets: i64,
    pub reps: i64,
    pub logged_at: DateTime<Utc>,
}

pub type ReplayService = domain::Service<InMemory, ManualClock>;

pub fn read(path: &Path) -> anyhow::Result<Vec<ReplayEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read exercise log {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse exercise log {}", path.display()))
}

/// Creates an empty service over `catalog` with its clock set to `now`.
pub fn service(catalog: Vec<domain::MuscleGroup>, now: DateTime<Utc>) -> ReplayService {
    domain::Service::with_clock(InMemory::new(catalog), ManualClock::new(now))
}

/// Logs all entries in chronological order and regenerates the recommendations as of `now`.
///
/// Entries with equal timestamps keep their order in the file.
pub async fn replay(
    mut entries: Vec<ReplayEntry>,
    catalog: Vec<domain::MuscleGroup>,
    now: DateTime<Utc>,
) -> anyhow::Result<ReplayService> {
    let service = service(catalog, now);

    entries.sort_by_key(|e| e.logged_at);

    for (index, entry) in entries.into_iter().enumerate() {
        let logged_at = entry.logged_at;
        let request = domain::NewExerciseLogEntry::try_from(json::LogExerciseRequest {
            name: entry.name,
            muscle_group_id: entry.muscle_group_id,
            sets: entry.sets,
            reps: entry.reps,
        })
        .with_context(|| format!("invalid exercise log entry {index} ({logged_at})"))?;
        service.clock().set(logged_at);
        service
            .log_exercise(request)
            .await
            .with_context(|| format!("failed to log exercise log entry {index} ({logged_at})"))?;
    }

    service.clock().set(now);
    let recommendations = service
        .regenerate_recommendations()
        .await
        .context("failed to regenerate recommendations")?;
    info!(
        "replayed exercise log, {} recommendations as of {now}",
        recommendations.len()
    );

    Ok(service)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
    }

    fn entries(json: &str) -> Vec<ReplayEntry> {
        serde_json::from_str(json).unwrap()
    }

    fn catalog() -> Vec<domain::MuscleGroup> {
        vec![
            domain::MuscleGroup {
                id: 1.into(),
                name: domain::Name::new("Legs").unwrap(),
                rest_days: 2.into(),
            },
            domain::MuscleGroup {
                id: 2.into(),
                name: domain::Name::new("Chest").unwrap(),
                rest_days: 2.into(),
            },
        ]
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            entries(
                r#"[{ "name": "Squat", "muscleGroupId": 1, "sets": 5, "reps": 5,
                      "loggedAt": "2024-01-04T12:00:00Z" }]"#
            ),
            vec![ReplayEntry {
                name: "Squat".to_string(),
                muscle_group_id: 1,
                sets: 5,
                reps: 5,
                logged_at: day(4),
            }]
        );
    }

    #[tokio::test]
    async fn test_replay() {
        let service = replay(
            entries(
                r#"[
                    { "name": "Squat", "muscleGroupId": 1, "sets": 5, "reps": 5,
                      "loggedAt": "2024-01-08T12:00:00Z" },
                    { "name": "Lunge", "muscleGroupId": 1, "sets": 3, "reps": 10,
                      "loggedAt": "2024-01-04T12:00:00Z" },
                    { "name": "Squat", "muscleGroupId": 1, "sets": 5, "reps": 5,
                      "loggedAt": "2024-01-06T12:00:00Z" }
                ]"#,
            ),
            catalog(),
            day(10),
        )
        .await
        .unwrap();

        assert_eq!(
            service
                .get_exercise_log()
                .await
                .unwrap()
                .iter()
                .map(|e| (e.name.to_string(), e.logged_at))
                .collect::<Vec<_>>(),
            vec![
                ("Lunge".to_string(), day(4)),
                ("Squat".to_string(), day(6)),
                ("Squat".to_string(), day(8)),
            ]
        );
        assert_eq!(
            service
                .get_recommendations()
                .await
                .unwrap()
                .iter()
                .map(|r| (*r.muscle_group_id, r.reason))
                .collect::<Vec<_>>(),
            vec![
                (2, domain::Reason::NoRecentWorkouts),
                (1, domain::Reason::RegularPattern),
            ]
        );
    }

    #[tokio::test]
    async fn test_replay_empty_log() {
        let service = replay(vec![], catalog(), day(10)).await.unwrap();

        assert_eq!(service.get_recommendations().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replay_invalid_entry() {
        let result = replay(
            entries(
                r#"[{ "name": "Squat", "muscleGroupId": 1, "sets": 0, "reps": 5,
                      "loggedAt": "2024-01-08T12:00:00Z" }]"#,
            ),
            catalog(),
            day(10),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_replay_unknown_muscle_group() {
        let result = replay(
            entries(
                r#"[{ "name": "Curl", "muscleGroupId": 7, "sets": 3, "reps": 10,
                      "loggedAt": "2024-01-08T12:00:00Z" }]"#,
            ),
            catalog(),
            day(10),
        )
        .await;

        assert!(result.is_err());
    }
}
