// panop-api: Async client for the appliance XML API (keygen + operational commands)

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;

pub use auth::{Credentials, SessionKey, extract_key};
pub use client::{ApplianceClient, DEFAULT_KEYGEN_TIMEOUT, DEFAULT_OP_TIMEOUT, OpReply};
pub use error::{Error, Step};
pub use transport::{
    API_KEY_HEADER, ApiRequest, ApiResponse, HttpTransport, TlsMode, Transport, TransportConfig,
    TransportError,
};
