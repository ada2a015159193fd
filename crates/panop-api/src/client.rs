// Appliance API client
//
// Two calls against `/api/`: `type=keygen` turns credentials into a session
// key, `type=op` runs one compiled operational command with that key in the
// `X-PAN-KEY` header. Neither call retries and neither interprets the
// appliance's `<response status=...>` envelope beyond finding the key.

use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::{debug, info};
use url::Url;

use crate::auth::{self, Credentials, SessionKey};
use crate::error::{Error, Step};
use crate::transport::{ApiRequest, Transport};

/// Default budget for the keygen call.
pub const DEFAULT_KEYGEN_TIMEOUT: Duration = Duration::from_secs(15);

/// Default budget for an operational command.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(30);

const API_PATH: &str = "api/";
const PREVIEW_LEN: usize = 200;

/// What one operational command returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpReply {
    /// The request URL as sent, credentials masked.
    pub url: String,
    /// Raw response body.
    pub body: String,
}

/// Client for one appliance, generic over the [`Transport`] that performs I/O.
#[derive(Debug)]
pub struct ApplianceClient<T> {
    transport: T,
    base_url: Url,
    target: String,
    keygen_timeout: Duration,
    op_timeout: Duration,
}

impl<T: Transport> ApplianceClient<T> {
    /// Client for `https://{host}/`.
    pub fn for_host(host: &str, transport: T) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://{host}/"))?;
        Ok(Self::new(base_url, host, transport))
    }

    /// Client with an explicit base URL (alternate port, test server).
    pub fn new(base_url: Url, target: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url,
            target: target.into(),
            keygen_timeout: DEFAULT_KEYGEN_TIMEOUT,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    pub fn with_keygen_timeout(mut self, timeout: Duration) -> Self {
        self.keygen_timeout = timeout;
        self
    }

    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    /// The appliance name used in error context.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn api_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(API_PATH)?)
    }

    /// `{base}/api/?type=keygen&user={user}&password={secret}`
    pub fn keygen_request(&self, credentials: &Credentials) -> Result<ApiRequest, Error> {
        let mut url = self.api_url()?;
        url.query_pairs_mut()
            .append_pair("type", "keygen")
            .append_pair("user", &credentials.username)
            .append_pair("password", credentials.password.expose_secret());

        Ok(ApiRequest {
            url,
            api_key: None,
            timeout: self.keygen_timeout,
        })
    }

    /// `{base}/api/?type=op&cmd={command}`, key attached as a header.
    pub fn op_request(&self, key: &SessionKey, command: &str) -> Result<ApiRequest, Error> {
        let mut url = self.api_url()?;
        url.query_pairs_mut()
            .append_pair("type", "op")
            .append_pair("cmd", command);

        Ok(ApiRequest {
            url,
            api_key: Some(key.clone()),
            timeout: self.op_timeout,
        })
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Exchange credentials for a session key.
    ///
    /// An empty body is [`Error::EmptyKeyResponse`]; a body without a
    /// `<key>` element is [`Error::MissingKey`]. Transport failures keep
    /// their own variant so they are not mistaken for bad credentials.
    pub async fn acquire_session_key(&self, credentials: &Credentials) -> Result<SessionKey, Error> {
        let request = self.keygen_request(credentials)?;
        debug!(target_host = %self.target, user = %credentials.username, "requesting session key");

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|source| Error::Transport {
                target: self.target.clone(),
                step: Step::Keygen,
                source,
            })?;

        if response.body.trim().is_empty() {
            return Err(Error::EmptyKeyResponse {
                target: self.target.clone(),
            });
        }

        let key = auth::extract_key(&response.body).ok_or_else(|| Error::MissingKey {
            target: self.target.clone(),
            preview: auth::preview(&response.body, PREVIEW_LEN),
        })?;

        info!(target_host = %self.target, "session key acquired");
        Ok(SessionKey::new(key))
    }

    /// Run one compiled operational command. The reply carries the raw body
    /// and the masked URL of the request that was actually sent.
    ///
    /// Appliance-level errors (`status="error"`) come back as ordinary
    /// bodies; only transport failures are errors here.
    pub async fn execute(&self, key: &SessionKey, command: &str) -> Result<OpReply, Error> {
        let request = self.op_request(key, command)?;
        debug!(target_host = %self.target, command, "executing operational command");

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|source| Error::Transport {
                target: self.target.clone(),
                step: Step::Execute,
                source,
            })?;

        debug!(status = response.status, bytes = response.body.len(), "command response");
        Ok(OpReply {
            url: request.redacted_url(),
            body: response.body,
        })
    }
}
