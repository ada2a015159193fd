// panop-core: Token classification, command compilation, and the session
// pipeline between panop-api and the CLI.

pub mod command;
pub mod error;
pub mod session;
pub mod target;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{ClassifiedCommand, OpCommand, TagClosing, classify, compile, is_literal_value};
pub use error::CoreError;
pub use session::{ConnectOptions, OpOutcome, Session};
pub use target::Target;

pub use panop_api::{Credentials, HttpTransport, SessionKey, Step, TlsMode, TransportConfig};
