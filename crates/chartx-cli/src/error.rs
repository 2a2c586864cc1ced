use chartx_core::CoreError;
use chartx_data::LoadError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] chartx_core::ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to load price data: {0}")]
    Load(#[from] LoadError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error("invalid log filter: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Logging(_) => 2,
            Self::Core(error) if !error.is_internal() => 2,
            Self::Load(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Core(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use chartx_core::{EntityId, ValidationError};

    use super::*;

    #[test]
    fn maps_categories_to_exit_codes() {
        let unknown = CliError::Core(CoreError::UnknownEntity {
            id: EntityId::parse("Acme").expect("valid id"),
        });
        assert_eq!(unknown.exit_code(), 2);

        let internal = CliError::Core(CoreError::LengthMismatch { left: 1, right: 2 });
        assert_eq!(internal.exit_code(), 10);

        let load = CliError::Load(LoadError::MissingHeader {
            path: String::from("a.csv"),
            row: 1,
        });
        assert_eq!(load.exit_code(), 4);

        assert_eq!(CliError::Validation(ValidationError::EmptyEntityId).exit_code(), 2);
        assert_eq!(
            CliError::StrictModeViolation {
                warning_count: 1,
                error_count: 0
            }
            .exit_code(),
            5
        );
    }
}
