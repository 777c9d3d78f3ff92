use crate::{MuscleGroupID, NameError};

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ReadError> for CreateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => CreateError::Other("not found".into()),
            ReadError::Storage(storage) => CreateError::Storage(storage),
            ReadError::Other(other) => CreateError::Other(other),
        }
    }
}

impl From<UpdateError> for CreateError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::NotFound => CreateError::Other("not found".into()),
            UpdateError::Validation(validation) => CreateError::Validation(validation),
            UpdateError::Storage(storage) => CreateError::Storage(storage),
            UpdateError::Other(other) => CreateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ReadError> for UpdateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => UpdateError::NotFound,
            ReadError::Storage(storage) => UpdateError::Storage(storage),
            ReadError::Other(other) => UpdateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("Sets must be a positive integer ({0})")]
    InvalidSets(i64),
    #[error("Reps must be a positive integer ({0})")]
    InvalidReps(i64),
    #[error("Window must span at least one day")]
    InvalidWindow,
    #[error("Target value must be a positive integer ({0})")]
    InvalidTargetValue(i64),
    #[error("Current value must not be negative ({0})")]
    InvalidCurrentValue(i64),
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Unknown muscle group ({0})")]
    UnknownMuscleGroup(MuscleGroupID),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::validation(
        CreateError::Validation(ValidationError::InvalidSets(0)),
        "Sets must be a positive integer (0)"
    )]
    #[case::storage(CreateError::Storage(StorageError::Unavailable), "storage unavailable")]
    #[case::other(CreateError::Other("foo".into()), "foo")]
    fn test_create_error_display(#[case] error: CreateError, #[case] expected: &str) {
        match &error {
            CreateError::Validation(_) | CreateError::Storage(_) | CreateError::Other(_) => {}
        }
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_update_error_from_read_error() {
        assert!(matches!(
            UpdateError::from(ReadError::NotFound),
            UpdateError::NotFound
        ));
        assert!(matches!(
            UpdateError::from(ReadError::Storage(StorageError::Unavailable)),
            UpdateError::Storage(StorageError::Unavailable)
        ));
        assert!(matches!(
            UpdateError::from(ReadError::Other("foo".into())),
            UpdateError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_create_error_from_update_error() {
        assert!(matches!(
            CreateError::from(UpdateError::Validation(ValidationError::InvalidSets(0))),
            CreateError::Validation(ValidationError::InvalidSets(0))
        ));
        assert!(matches!(
            CreateError::from(UpdateError::Storage(StorageError::Unavailable)),
            CreateError::Storage(StorageError::Unavailable)
        ));
        assert!(matches!(
            CreateError::from(UpdateError::Other("foo".into())),
            CreateError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_create_error_from_read_error() {
        assert!(matches!(
            CreateError::from(ReadError::Storage(StorageError::Unavailable)),
            CreateError::Storage(StorageError::Unavailable)
        ));
        assert!(matches!(
            CreateError::from(ReadError::NotFound),
            CreateError::Other(error) if error.to_string() == "not found"
        ));
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::UnknownMuscleGroup(7.into()).to_string(),
            "Unknown muscle group (7)"
        );
        assert_eq!(
            ValidationError::InvalidReps(-3).to_string(),
            "Reps must be a positive integer (-3)"
        );
    }
}
