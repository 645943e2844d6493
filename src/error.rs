//! Error handling for Hearth Physics
//!
//! The simulation hot path has no error returns: "no contact" is an empty
//! `Option` and timestep preconditions are the caller's job. Errors only
//! surface at the edges - checked lookups and configuration loading.

use thiserror::Error;

/// Main error type for Hearth Physics
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("Rigid body not found: {handle}")]
    BodyNotFound { handle: u64 },

    #[error("Collider not found: {handle}")]
    ColliderNotFound { handle: u64 },

    #[error("Invalid config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Config parse error: {error}")]
    ConfigParse { error: String },

    #[error("IO error for {path}: {error}")]
    Io { path: String, error: String },

    #[error("Serialization error in {context}: {error}")]
    Serialization { context: String, error: String },
}

/// Type alias for Results in Hearth Physics
pub type PhysicsResult<T> = Result<T, PhysicsError>;

impl From<toml::de::Error> for PhysicsError {
    fn from(error: toml::de::Error) -> Self {
        PhysicsError::ConfigParse {
            error: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for PhysicsError {
    fn from(error: serde_json::Error) -> Self {
        PhysicsError::Serialization {
            context: "json".to_string(),
            error: error.to_string(),
        }
    }
}

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_physics<F>(self, f: F) -> PhysicsResult<T>
    where
        F: FnOnce() -> PhysicsError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_physics<F>(self, f: F) -> PhysicsResult<T>
    where
        F: FnOnce() -> PhysicsError,
    {
        self.ok_or_else(f)
    }
}

/// Shorthand for an `InvalidConfig` error
pub(crate) fn invalid_config(field: &str, value: impl ToString, reason: &str) -> PhysicsError {
    PhysicsError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PhysicsError::BodyNotFound { handle: 42 };
        assert_eq!(err.to_string(), "Rigid body not found: 42");

        let err = invalid_config("fixed_timestep", 0.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config: fixed_timestep = 0 (must be positive)"
        );
    }

    #[test]
    fn test_option_ext() {
        let opt: Option<i32> = None;
        let result = opt.ok_or_physics(|| PhysicsError::ColliderNotFound { handle: 7 });
        assert!(matches!(
            result,
            Err(PhysicsError::ColliderNotFound { handle: 7 })
        ));

        let opt = Some(3);
        assert_eq!(
            opt.ok_or_physics(|| PhysicsError::BodyNotFound { handle: 0 })
                .ok(),
            Some(3)
        );
    }

    #[test]
    fn test_toml_error_converts() {
        let parsed: Result<toml::Value, toml::de::Error> = toml::from_str("gravity = [");
        let err: PhysicsError = match parsed {
            Ok(_) => panic!("malformed toml should not parse"),
            Err(e) => e.into(),
        };
        assert!(matches!(err, PhysicsError::ConfigParse { .. }));
    }
}
