use strum::Display;
use thiserror::Error;

use crate::transport::TransportError;

/// Which of the two appliance calls a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    #[strum(serialize = "key acquisition")]
    Keygen,
    #[strum(serialize = "command execution")]
    Execute,
}

/// Top-level error type for the `panop-api` crate.
///
/// Every variant that involves the network carries the target and the
/// [`Step`] that failed, so a report is diagnosable without re-running
/// in verbose mode. `panop-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The keygen endpoint answered with an empty body.
    #[error("{target}: key acquisition returned an empty response")]
    EmptyKeyResponse { target: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The keygen response did not contain a usable `<key>` element.
    #[error("{target}: no session key in keygen response (body preview: {preview:?})")]
    MissingKey { target: String, preview: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Network, TLS, or timeout failure during one of the calls.
    #[error("{target}: {step} failed: {source}")]
    Transport {
        target: String,
        step: Step,
        #[source]
        source: TransportError,
    },

    /// URL construction failed for the given target.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the appliance refused or never issued a key.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::EmptyKeyResponse { .. })
    }

    /// Returns `true` if the failure happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The step that failed, if the error came from one of the calls.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::EmptyKeyResponse { .. } | Self::MissingKey { .. } => Some(Step::Keygen),
            Self::Transport { step, .. } => Some(*step),
            Self::InvalidUrl(_) => None,
        }
    }
}
