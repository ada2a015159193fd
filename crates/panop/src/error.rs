//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and a distinct exit code per fault class.

use miette::Diagnostic;
use thiserror::Error;

use panop_config::ConfigError;
use panop_core::{CoreError, Step};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const INVALID_TARGET: i32 = 4;
    pub const PAYLOAD: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("\"{target}\" is not a valid firewall name")]
    #[diagnostic(
        code(panop::invalid_target),
        help("Firewall names must contain \"lan\" or \"wan\" (any case), e.g. lan1 or edge-WAN2.")
    )]
    InvalidTarget { target: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(panop::validation))]
    Validation { field: String, reason: String },

    #[error("No commands found in {path}")]
    #[diagnostic(
        code(panop::empty_batch),
        help("Put one command per line, e.g.:\n  show system info\n  show arp all")
    )]
    EmptyBatch { path: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for {target}: {message}")]
    #[diagnostic(
        code(panop::auth_failed),
        help("Check the username and password, and that the account has XML API access.")
    )]
    AuthFailed { target: String, message: String },

    #[error("No credentials available: {reason}")]
    #[diagnostic(
        code(panop::no_credentials),
        help(
            "Set PANOP_USERNAME and PANOP_PASSWORD, store the password in the system keyring\n\
             under service 'panop' as '<username>/password', or create a .creds file\n\
             (username on line 1, password on line 2)."
        )
    )]
    NoCredentials { reason: String },

    // ── Appliance payload ────────────────────────────────────────────
    #[error("Unexpected {step} response from {target}")]
    #[diagnostic(
        code(panop::malformed_response),
        help("{message}\nRe-run with -v to see the full exchange.")
    )]
    MalformedResponse {
        target: String,
        step: Step,
        message: String,
    },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {target} during {step}")]
    #[diagnostic(
        code(panop::connection_failed),
        help("{reason}\nCheck that {target} resolves and its management interface allows HTTPS.")
    )]
    ConnectionFailed {
        target: String,
        step: Step,
        reason: String,
    },

    #[error("{step} against {target} timed out after {seconds}s")]
    #[diagnostic(
        code(panop::timeout),
        help("Increase the budget with --timeout (or keygen_timeout in the config file).")
    )]
    Timeout {
        target: String,
        step: Step,
        seconds: u64,
    },

    // ── Batch ────────────────────────────────────────────────────────
    #[error("{failed} of {total} commands failed")]
    #[diagnostic(code(panop::batch_failed))]
    BatchFailed {
        failed: usize,
        total: usize,
        #[related]
        errors: Vec<CliError>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(panop::config),
        help("Default config file: {path}")
    )]
    Config { message: String, path: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(panop::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::EmptyBatch { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::InvalidTarget { .. } => exit_code::INVALID_TARGET,
            Self::MalformedResponse { .. } => exit_code::PAYLOAD,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::BatchFailed { errors, .. } => errors
                .first()
                .map_or(exit_code::GENERAL, CliError::exit_code),
            Self::Config { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTarget { target } => CliError::InvalidTarget { target },

            CoreError::AuthenticationFailed { target, message } => {
                CliError::AuthFailed { target, message }
            }

            CoreError::MalformedResponse {
                target,
                step,
                message,
            } => CliError::MalformedResponse {
                target,
                step,
                message,
            },

            CoreError::ConnectionFailed {
                target,
                step,
                reason,
            } => CliError::ConnectionFailed {
                target,
                step,
                reason,
            },

            CoreError::Timeout {
                target,
                step,
                timeout_secs,
            } => CliError::Timeout {
                target,
                step,
                seconds: timeout_secs,
            },

            CoreError::Config { message } => CliError::Config {
                message,
                path: default_config_path(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoUsername | ConfigError::NoPassword { .. } | ConfigError::CredsFile { .. } => {
                CliError::NoCredentials {
                    reason: err.to_string(),
                }
            }
            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
                path: default_config_path(),
            },
        }
    }
}

fn default_config_path() -> String {
    panop_config::config_path().display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_fault_class_has_its_own_exit_code() {
        let invalid: CliError = CoreError::InvalidTarget {
            target: "core-switch".into(),
        }
        .into();
        let auth: CliError = CoreError::AuthenticationFailed {
            target: "lan1".into(),
            message: "empty".into(),
        }
        .into();
        let payload: CliError = CoreError::MalformedResponse {
            target: "lan1".into(),
            step: Step::Keygen,
            message: "no key".into(),
        }
        .into();
        let timeout: CliError = CoreError::Timeout {
            target: "lan1".into(),
            step: Step::Execute,
            timeout_secs: 30,
        }
        .into();

        assert_eq!(invalid.exit_code(), exit_code::INVALID_TARGET);
        assert_eq!(auth.exit_code(), exit_code::AUTH);
        assert_eq!(payload.exit_code(), exit_code::PAYLOAD);
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn batch_exit_code_follows_first_failure() {
        let err = CliError::BatchFailed {
            failed: 2,
            total: 3,
            errors: vec![
                CliError::ConnectionFailed {
                    target: "lan1".into(),
                    step: Step::Execute,
                    reason: "reset".into(),
                },
                CliError::Timeout {
                    target: "lan1".into(),
                    step: Step::Execute,
                    seconds: 30,
                },
            ],
        };
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn missing_credentials_map_to_auth_exit() {
        let err: CliError = ConfigError::NoUsername.into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(err.to_string().contains("no username"));
    }
}
