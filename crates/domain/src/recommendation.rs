use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use log::debug;

use crate::{ExerciseLogEntry, MuscleGroup, MuscleGroupID, ReadError, RestDays, UpdateError};

#[allow(async_fn_in_trait)]
pub trait RecommendationService {
    async fn get_recommendations(&self) -> Result<Vec<Recommendation>, ReadError>;
    /// Recomputes the full set from the current catalog and the last week of the exercise log
    /// and replaces the stored set with it.
    async fn regenerate_recommendations(&self) -> Result<Vec<Recommendation>, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait RecommendationRepository {
    async fn read_recommendations(&self) -> Result<Vec<Recommendation>, ReadError>;
    /// Clears the stored set and inserts `recommendations` in order, numbering them from 1.
    async fn replace_recommendations(
        &self,
        recommendations: Vec<NewRecommendation>,
    ) -> Result<Vec<Recommendation>, UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub id: RecommendationID,
    pub muscle_group_id: MuscleGroupID,
    pub priority: Priority,
    pub reason: Reason,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecommendationID(u32);

impl From<u32> for RecommendationID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecommendation {
    pub muscle_group_id: MuscleGroupID,
    pub priority: Priority,
    pub reason: Reason,
}

impl NewRecommendation {
    #[must_use]
    pub fn new(muscle_group_id: MuscleGroupID, reason: Reason) -> Self {
        Self {
            muscle_group_id,
            priority: reason.priority(),
            reason,
        }
    }
}

/// Urgency of training a muscle group, from 1 (keep resting) to 5 (train now).
#[derive(Deref, Display, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    pub const RESTING: Priority = Priority(1);
    pub const ROUTINE: Priority = Priority(2);
    pub const HIGH: Priority = Priority(4);
    pub const URGENT: Priority = Priority(5);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NoRecentWorkouts,
    NeedsRest { remaining_days: u32 },
    NotWorkedOutThisWeek,
    OnlyOnceThisWeek,
    ExtendedBreak,
    RegularPattern,
}

impl Reason {
    #[must_use]
    pub fn priority(self) -> Priority {
        match self {
            Reason::NoRecentWorkouts | Reason::NotWorkedOutThisWeek => Priority::URGENT,
            Reason::OnlyOnceThisWeek | Reason::ExtendedBreak => Priority::HIGH,
            Reason::RegularPattern => Priority::ROUTINE,
            Reason::NeedsRest { .. } => Priority::RESTING,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reason::NoRecentWorkouts => write!(f, "No recent workouts for this muscle group"),
            Reason::NeedsRest { remaining_days } => {
                write!(f, "Needs {remaining_days} more rest day(s)")
            }
            Reason::NotWorkedOutThisWeek => write!(f, "Not worked out in the past week"),
            Reason::OnlyOnceThisWeek => write!(f, "Only worked out once in the past week"),
            Reason::ExtendedBreak => write!(f, "Extended period since last workout"),
            Reason::RegularPattern => write!(f, "Regular workout pattern maintained"),
        }
    }
}

/// Training of a muscle group within the evaluated window.
///
/// `activity` only creates an entry for a group once it has seen a session, so `sessions` is
/// at least 1 for every value it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub sessions: u32,
    pub last_session: DateTime<Utc>,
}

#[must_use]
pub fn activity(recent: &[ExerciseLogEntry]) -> BTreeMap<MuscleGroupID, Activity> {
    let mut result: BTreeMap<MuscleGroupID, Activity> = BTreeMap::new();
    for entry in recent {
        result
            .entry(entry.muscle_group_id)
            .and_modify(|a| {
                a.sessions += 1;
                a.last_session = a.last_session.max(entry.logged_at);
            })
            .or_insert(Activity {
                sessions: 1,
                last_session: entry.logged_at,
            });
    }
    result
}

/// Whole days elapsed since `since`. Timestamps ahead of `now` count as zero days.
#[must_use]
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    u32::try_from((now - since).num_days().max(0)).unwrap_or(u32::MAX)
}

#[must_use]
pub fn assess(rest_days: RestDays, activity: Option<&Activity>, now: DateTime<Utc>) -> Reason {
    let Some(activity) = activity else {
        return Reason::NoRecentWorkouts;
    };

    let days = days_since(activity.last_session, now);

    if days < *rest_days {
        Reason::NeedsRest {
            remaining_days: *rest_days - days,
        }
    } else if activity.sessions == 0 {
        // Unreachable for values built by `activity`, which counts at least one session.
        Reason::NotWorkedOutThisWeek
    } else if activity.sessions == 1 {
        Reason::OnlyOnceThisWeek
    } else if days >= rest_days.saturating_mul(2) {
        Reason::ExtendedBreak
    } else {
        Reason::RegularPattern
    }
}

/// Computes one recommendation per muscle group, ordered by descending priority.
///
/// Groups of equal priority keep their catalog order. Entries referring to muscle groups outside
/// of the catalog are ignored.
#[must_use]
pub fn evaluate(
    recent: &[ExerciseLogEntry],
    catalog: &[MuscleGroup],
    now: DateTime<Utc>,
) -> Vec<NewRecommendation> {
    let activity = activity(recent);
    let mut recommendations = catalog
        .iter()
        .map(|group| {
            let reason = assess(group.rest_days, activity.get(&group.id), now);
            debug!("{} ({}): {reason}", group.name, group.id);
            NewRecommendation::new(group.id, reason)
        })
        .collect::<Vec<_>>();
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    recommendations
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{ExerciseLogEntryID, Name, Reps, Sets};

    #[rstest]
    #[case(Reason::NoRecentWorkouts, "No recent workouts for this muscle group", 5)]
    #[case(Reason::NeedsRest { remaining_days: 3 }, "Needs 3 more rest day(s)", 1)]
    #[case(Reason::NotWorkedOutThisWeek, "Not worked out in the past week", 5)]
    #[case(Reason::OnlyOnceThisWeek, "Only worked out once in the past week", 4)]
    #[case(Reason::ExtendedBreak, "Extended period since last workout", 4)]
    #[case(Reason::RegularPattern, "Regular workout pattern maintained", 2)]
    fn test_reason(#[case] reason: Reason, #[case] text: &str, #[case] priority: u8) {
        assert_eq!(reason.to_string(), text);
        assert_eq!(*reason.priority(), priority);
    }

    #[rstest]
    #[case::same_instant(day(10), day(10), 0)]
    #[case::less_than_a_day(day(10) - Duration::hours(23), day(10), 0)]
    #[case::one_day(day(9), day(10), 1)]
    #[case::five_days(day(5), day(10), 5)]
    #[case::future(day(12), day(10), 0)]
    fn test_days_since(
        #[case] since: DateTime<Utc>,
        #[case] now: DateTime<Utc>,
        #[case] expected: u32,
    ) {
        assert_eq!(days_since(since, now), expected);
    }

    #[test]
    fn test_activity() {
        let recent = vec![
            entry(1, 1, day(4)),
            entry(2, 1, day(8)),
            entry(3, 2, day(6)),
            entry(4, 1, day(6)),
        ];

        assert_eq!(
            activity(&recent),
            BTreeMap::from([
                (
                    MuscleGroupID::from(1),
                    Activity {
                        sessions: 3,
                        last_session: day(8)
                    }
                ),
                (
                    MuscleGroupID::from(2),
                    Activity {
                        sessions: 1,
                        last_session: day(6)
                    }
                ),
            ])
        );
    }

    #[test]
    fn test_activity_counts_at_least_one_session() {
        assert_eq!(activity(&[]), BTreeMap::new());

        let recent = (1..=6)
            .map(|id| entry(id, id % 3 + 1, day(id + 3)))
            .collect::<Vec<_>>();

        for n in 0..=recent.len() {
            assert!(activity(&recent[..n]).values().all(|a| a.sessions >= 1));
        }
        assert_eq!(
            activity(&recent)
                .values()
                .map(|a| a.sessions)
                .sum::<u32>(),
            6
        );
    }

    #[rstest]
    #[case::no_activity(2, None, Reason::NoRecentWorkouts)]
    #[case::resting(2, Some((1, day(9))), Reason::NeedsRest { remaining_days: 1 })]
    #[case::resting_long(4, Some((3, day(10))), Reason::NeedsRest { remaining_days: 4 })]
    #[case::no_sessions(2, Some((0, day(5))), Reason::NotWorkedOutThisWeek)]
    #[case::once(2, Some((1, day(8))), Reason::OnlyOnceThisWeek)]
    #[case::extended(2, Some((2, day(5))), Reason::ExtendedBreak)]
    #[case::extended_boundary(2, Some((2, day(6))), Reason::ExtendedBreak)]
    #[case::regular(2, Some((3, day(8))), Reason::RegularPattern)]
    #[case::regular_boundary(2, Some((2, day(7))), Reason::RegularPattern)]
    #[case::future_session(2, Some((2, day(12))), Reason::NeedsRest { remaining_days: 2 })]
    #[case::zero_rest_same_day(0, Some((1, day(10))), Reason::OnlyOnceThisWeek)]
    #[case::zero_rest_future(0, Some((2, day(12))), Reason::ExtendedBreak)]
    fn test_assess(
        #[case] rest_days: u32,
        #[case] activity: Option<(u32, DateTime<Utc>)>,
        #[case] expected: Reason,
    ) {
        let activity = activity.map(|(sessions, last_session)| Activity {
            sessions,
            last_session,
        });
        assert_eq!(
            assess(rest_days.into(), activity.as_ref(), day(10)),
            expected
        );
    }

    #[test]
    fn test_evaluate_without_entries() {
        assert_eq!(
            evaluate(&[], &catalog(), day(10)),
            vec![
                NewRecommendation::new(1.into(), Reason::NoRecentWorkouts),
                NewRecommendation::new(2.into(), Reason::NoRecentWorkouts),
            ]
        );
    }

    #[test]
    fn test_evaluate_orders_by_priority() {
        let recent = vec![entry(1, 1, day(9))];

        assert_eq!(
            evaluate(&recent, &catalog(), day(10)),
            vec![
                NewRecommendation::new(2.into(), Reason::NoRecentWorkouts),
                NewRecommendation::new(1.into(), Reason::NeedsRest { remaining_days: 1 }),
            ]
        );
    }

    #[test]
    fn test_evaluate_keeps_catalog_order_for_equal_priority() {
        let catalog = vec![
            group(3, "Back", 1),
            group(1, "Legs", 2),
            group(2, "Chest", 2),
            group(4, "Core", 0),
        ];
        let recent = vec![
            entry(1, 4, day(9)),
            entry(2, 2, day(8)),
            entry(3, 2, day(7)),
            entry(4, 2, day(6)),
        ];

        assert_eq!(
            evaluate(&recent, &catalog, day(10))
                .iter()
                .map(|r| (*r.muscle_group_id, *r.priority))
                .collect::<Vec<_>>(),
            vec![(3, 5), (1, 5), (4, 4), (2, 2)]
        );
    }

    #[test]
    fn test_evaluate_ignores_unknown_muscle_groups() {
        let recent = vec![entry(1, 42, day(9))];

        assert_eq!(
            evaluate(&recent, &catalog(), day(10)),
            vec![
                NewRecommendation::new(1.into(), Reason::NoRecentWorkouts),
                NewRecommendation::new(2.into(), Reason::NoRecentWorkouts),
            ]
        );
    }

    #[test]
    fn test_evaluate_empty_catalog() {
        assert_eq!(evaluate(&[entry(1, 1, day(9))], &[], day(10)), vec![]);
    }

    fn catalog() -> Vec<MuscleGroup> {
        vec![group(1, "Legs", 2), group(2, "Chest", 2)]
    }

    fn group(id: u32, name: &str, rest_days: u32) -> MuscleGroup {
        MuscleGroup {
            id: id.into(),
            name: Name::new(name).unwrap(),
            rest_days: rest_days.into(),
        }
    }

    fn entry(id: u32, muscle_group_id: u32, logged_at: DateTime<Utc>) -> ExerciseLogEntry {
        ExerciseLogEntry {
            id: ExerciseLogEntryID::from(id),
            name: Name::new("Exercise").unwrap(),
            muscle_group_id: muscle_group_id.into(),
            sets: Sets::new(3).unwrap(),
            reps: Reps::new(10).unwrap(),
            logged_at,
        }
    }

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
    }
}
