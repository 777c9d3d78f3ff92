use std::{fs, path::Path};

use anyhow::Context;
use restday_domain as domain;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub muscle_groups: Vec<MuscleGroup>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MuscleGroup {
    pub name: String,
    #[serde(default = "default_rest_days")]
    pub rest_days: u32,
}

fn default_rest_days() -> u32 {
    *domain::RestDays::DEFAULT
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("muscle group {index}: {source}")]
    Name {
        index: usize,
        source: domain::NameError,
    },
    #[error("muscle group \"{0}\" defined more than once")]
    Duplicate(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            muscle_groups: domain::default_catalog()
                .into_iter()
                .map(|g| MuscleGroup {
                    name: g.name.to_string(),
                    rest_days: *g.rest_days,
                })
                .collect(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            log::debug!("no configuration file given, using default catalog");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }

    /// Builds the catalog, numbering the muscle groups in file order starting at 1.
    pub fn catalog(&self) -> Result<Vec<domain::MuscleGroup>, ConfigError> {
        let mut catalog: Vec<domain::MuscleGroup> = Vec::with_capacity(self.muscle_groups.len());
        for (index, (id, group)) in (1_u32..).zip(&self.muscle_groups).enumerate() {
            let name = domain::Name::new(&group.name)
                .map_err(|source| ConfigError::Name { index, source })?;
            if catalog.iter().any(|g| g.name.collides_with(&name)) {
                return Err(ConfigError::Duplicate(name.to_string()));
            }
            catalog.push(domain::MuscleGroup {
                id: domain::MuscleGroupID::from(id),
                name,
                rest_days: group.rest_days.into(),
            });
        }
        Ok(catalog)
    }
}
