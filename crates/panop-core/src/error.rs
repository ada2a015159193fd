// ── Core error types ──
//
// User-facing errors from panop-core. The `From<panop_api::Error>` impl
// translates wire-level failures into domain variants; each keeps the
// target and the step that failed.

use thiserror::Error;

use panop_api::Step;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("\"{target}\" is not a valid firewall name (must contain \"lan\" or \"wan\")")]
    InvalidTarget { target: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for {target}: {message}")]
    AuthenticationFailed { target: String, message: String },

    // ── Appliance payload ────────────────────────────────────────────
    #[error("Malformed {step} response from {target}: {message}")]
    MalformedResponse {
        target: String,
        step: Step,
        message: String,
    },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach {target} during {step}: {reason}")]
    ConnectionFailed {
        target: String,
        step: Step,
        reason: String,
    },

    #[error("{step} against {target} timed out after {timeout_secs}s")]
    Timeout {
        target: String,
        step: Step,
        timeout_secs: u64,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The step that failed, for errors raised by an appliance call.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::AuthenticationFailed { .. } => Some(Step::Keygen),
            Self::MalformedResponse { step, .. }
            | Self::ConnectionFailed { step, .. }
            | Self::Timeout { step, .. } => Some(*step),
            Self::InvalidTarget { .. } | Self::Config { .. } => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<panop_api::Error> for CoreError {
    fn from(err: panop_api::Error) -> Self {
        match err {
            panop_api::Error::EmptyKeyResponse { target } => CoreError::AuthenticationFailed {
                target,
                message: "the appliance returned an empty keygen response".into(),
            },
            panop_api::Error::MissingKey { target, preview } => CoreError::MalformedResponse {
                target,
                step: Step::Keygen,
                message: format!("no <key> element (body preview: {preview:?})"),
            },
            panop_api::Error::Transport {
                target,
                step,
                source,
            } => {
                if let panop_api::TransportError::Timeout { timeout_secs } = source {
                    CoreError::Timeout {
                        target,
                        step,
                        timeout_secs,
                    }
                } else {
                    CoreError::ConnectionFailed {
                        target,
                        step,
                        reason: source.to_string(),
                    }
                }
            }
            panop_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
        }
    }
}
