use derive_more::{Deref, Display};

use crate::{Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait MuscleGroupService {
    async fn get_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait MuscleGroupRepository {
    /// Returns the catalog in its stable iteration order.
    async fn read_muscle_groups(&self) -> Result<Vec<MuscleGroup>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleGroup {
    pub id: MuscleGroupID,
    pub name: Name,
    pub rest_days: RestDays,
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MuscleGroupID(u32);

impl From<u32> for MuscleGroupID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Minimum number of days between two sessions of a muscle group.
///
/// Zero is valid and makes a group trainable at any time.
#[derive(Deref, Display, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RestDays(u32);

impl RestDays {
    pub const DEFAULT: RestDays = RestDays(1);
}

impl From<u32> for RestDays {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

const DEFAULT_MUSCLE_GROUPS: [&str; 6] = ["Legs", "Chest", "Back", "Shoulders", "Arms", "Core"];

#[must_use]
pub fn default_catalog() -> Vec<MuscleGroup> {
    DEFAULT_MUSCLE_GROUPS
        .iter()
        .zip(1..)
        .filter_map(|(name, id)| {
            Some(MuscleGroup {
                id: MuscleGroupID(id),
                name: Name::new(name).ok()?,
                rest_days: RestDays::DEFAULT,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = default_catalog();

        assert_eq!(
            catalog
                .iter()
                .map(|g| (*g.id, g.name.to_string(), *g.rest_days))
                .collect::<Vec<_>>(),
            vec![
                (1, "Legs".to_string(), 1),
                (2, "Chest".to_string(), 1),
                (3, "Back".to_string(), 1),
                (4, "Shoulders".to_string(), 1),
                (5, "Arms".to_string(), 1),
                (6, "Core".to_string(), 1),
            ]
        );
    }
}
