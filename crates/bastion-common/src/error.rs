//! Error types for Bastion.

use thiserror::Error;

/// World and chunk errors.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Chunk generation failed
    #[error("Generation of chunk ({x}, {y}) failed: {reason}")]
    GenerationFailed {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
        /// What went wrong
        reason: String,
    },

    /// Background worker could not be started or has gone away
    #[error("Chunk worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// Level parameters cannot produce geometry
    #[error("Invalid level config: {0}")]
    InvalidConfig(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for an [`ConfigError::Invalid`] error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_names_field() {
        let err = ConfigError::invalid("window.fps", "must be within 1..=1000");
        assert_eq!(
            err.to_string(),
            "Invalid value for window.fps: must be within 1..=1000"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn read() -> Result<(), ConfigError> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(read(), Err(ConfigError::Io(_))));
    }
}
