use std::{fs, io, path::Path};

use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{info, warn};
use restday_domain::{self as domain, GoalService};
use restday_storage::json;

use crate::replay::ReplayService;

/// Reads the stored goals. A missing file holds no goals.
pub fn read(path: &Path) -> anyhow::Result<Vec<json::Goal>> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse goals {}", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(vec![]),
        Err(err) => Err(err).with_context(|| format!("failed to read goals {}", path.display())),
    }
}

pub fn write(path: &Path, goals: &[domain::Goal]) -> anyhow::Result<()> {
    let content =
        serde_json::to_string_pretty(&goals.iter().map(json::Goal::from).collect::<Vec<_>>())
            .context("failed to serialize goals")?;
    fs::write(path, content + "\n")
        .with_context(|| format!("failed to write goals {}", path.display()))
}

/// Recreates stored goals in id order, each at its creation time, and sets the clock to `now`.
pub async fn restore(
    service: &ReplayService,
    mut goals: Vec<json::Goal>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    goals.sort_by_key(|g| g.id);

    for goal in goals {
        let id = goal.id;
        let new_goal = domain::NewGoal::try_from(json::CreateGoalRequest {
            muscle_group_id: goal.muscle_group_id,
            kind: goal.kind,
            description: goal.description,
            target_value: i64::from(goal.target_value),
            deadline: goal.deadline,
        })
        .with_context(|| format!("invalid goal {id}"))?;
        service.clock().set(goal.created_at);
        let created = service
            .create_goal(new_goal)
            .await
            .with_context(|| format!("failed to restore goal {id}"))?;
        if *created.id != id {
            warn!("goal {id} renumbered to {}", created.id);
        }
        if goal.current_value > 0 {
            let update = domain::GoalUpdate::try_from(json::UpdateGoalRequest {
                current_value: Some(i64::from(goal.current_value)),
                ..json::UpdateGoalRequest::default()
            })
            .with_context(|| format!("invalid goal {id}"))?;
            service
                .modify_goal(created.id, update)
                .await
                .with_context(|| format!("failed to restore goal {id}"))?;
        }
    }

    service.clock().set(now);
    Ok(())
}

pub async fn list(
    service: &ReplayService,
    overdue: bool,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<domain::Goal>> {
    let goals = service.get_goals().await.context("failed to get goals")?;
    Ok(if overdue {
        goals.into_iter().filter(|g| g.is_overdue(now)).collect()
    } else {
        goals
    })
}

/// Adds the goal described by a `CreateGoalRequest` body.
pub async fn create(service: &ReplayService, request: &str) -> anyhow::Result<domain::Goal> {
    let request: json::CreateGoalRequest =
        serde_json::from_str(request).context("failed to parse goal")?;
    let goal = domain::NewGoal::try_from(request).context("invalid goal")?;
    let goal = service
        .create_goal(goal)
        .await
        .context("failed to create goal")?;
    info!("created goal {} ({})", goal.id, goal.description);
    Ok(goal)
}

/// Applies the changes of an `UpdateGoalRequest` body.
pub async fn update(
    service: &ReplayService,
    id: domain::GoalID,
    request: &str,
) -> anyhow::Result<domain::Goal> {
    let request: json::UpdateGoalRequest =
        serde_json::from_str(request).context("failed to parse goal update")?;
    let update = domain::GoalUpdate::try_from(request).context("invalid goal update")?;
    let goal = service
        .modify_goal(id, update)
        .await
        .with_context(|| format!("failed to update goal {id}"))?;
    info!("updated goal {} ({}%)", goal.id, goal.progress());
    Ok(goal)
}
