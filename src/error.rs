//! Error taxonomy for diskpart-tui.
//!
//! Two families, both recoverable and shown in place:
//! - `ValidationError`: user input rejected before any script is built
//! - `ExecError`: the script could not be written or the tool not started
//!
//! A tool that runs and exits non-zero is NOT an error at this level;
//! its exit code travels inside `ExecutionResult`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} must be a whole number, got \"{value}\"")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} is too large: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

impl ValidationError {
    /// Name of the field that was rejected.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Empty { field }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Zero { field } => field,
        }
    }
}

/// Failure to hand a script to the external tool.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("could not write script file `{}`: {source}", path.display())]
    WriteScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not start `{}`: {source}", tool.display())]
    Spawn {
        tool: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::NotANumber {
            field: "Disk number",
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "Disk number must be a whole number, got \"abc\"");
        assert_eq!(err.field(), "Disk number");
    }

    #[test]
    fn spawn_error_mentions_tool() {
        let err = ExecError::Spawn {
            tool: PathBuf::from("diskpart"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("`diskpart`"));
        assert!(msg.contains("not found"));
    }
}
