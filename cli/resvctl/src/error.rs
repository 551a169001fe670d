//! Error handling and display for the CLI.

use colored::Colorize;
use resv_reconcile::PlanError;
use resv_resources::StateError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum ResvError {
    #[error("No resources are reserved for role '{role}'")]
    RoleNotFound { role: String },

    #[error("Request to {path} failed: {message}")]
    Transport {
        path: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Rejected by the master ({status}): {message}")]
    Validation { status: u16, message: String },
}

impl ResvError {
    /// Create a transport error for a failed exchange.
    pub fn transport(
        path: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            path: path.into(),
            status,
            message: message.into(),
        }
    }
}

impl From<StateError> for ResvError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::RoleNotFound { role } => Self::RoleNotFound { role },
            StateError::Decode(e) => Self::Decode(e.to_string()),
        }
    }
}

impl From<PlanError> for ResvError {
    fn from(err: PlanError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ResvError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(resv_err) = err.downcast_ref::<ResvError>() {
        match resv_err {
            ResvError::RoleNotFound { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Check the role name with `resvctl list`. Released reservations are not listed."
                        .yellow()
                );
            }
            ResvError::Transport {
                status: Some(401), ..
            } => {
                eprintln!(
                    "\n{}",
                    "Hint: Pass a valid ACS token with --token or RESV_TOKEN.".yellow()
                );
            }
            ResvError::Transport {
                status: Some(409), ..
            } => {
                eprintln!(
                    "\n{}",
                    "Hint: The agent's reservations changed. Re-run the command to rediscover them."
                        .yellow()
                );
            }
            ResvError::Transport { status: None, .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and --cluster-url.".yellow()
                );
            }
            ResvError::Validation { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Unreserve and destroy calls need the reservation's resource id; see `resvctl list`."
                        .yellow()
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_not_found_from_state_error() {
        let err: ResvError = StateError::RoleNotFound {
            role: "absent-role".into(),
        }
        .into();
        assert!(matches!(err, ResvError::RoleNotFound { role } if role == "absent-role"));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err: ResvError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ResvError::Decode(_)));
    }
}
