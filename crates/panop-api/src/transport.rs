// Transport abstraction and the reqwest-backed implementation.
//
// `ApplianceClient` never touches reqwest directly: it hands an `ApiRequest`
// to a `Transport` and gets back the status and body. Tests swap in a
// recording double; production uses `HttpTransport`.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::auth::SessionKey;

/// Header carrying the session key on operational calls.
pub const API_KEY_HEADER: &str = "X-PAN-KEY";

/// Query parameters whose values never appear in logs or output.
const REDACTED_PARAMS: &[&str] = &["password", "key"];

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate. Appliances ship with self-signed management certs.
    #[default]
    DangerAcceptInvalid,
}

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            connect_timeout: Duration::from_secs(15),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(concat!("panop/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| TransportError::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| TransportError::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| TransportError::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── Request / response ───────────────────────────────────────────────

/// A single outbound GET against the appliance API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: Url,
    /// Sent as the [`API_KEY_HEADER`] header when present.
    pub api_key: Option<SessionKey>,
    /// Total time budget for this call.
    pub timeout: Duration,
}

impl ApiRequest {
    /// Decoded value of the first query parameter called `name`.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// The request URL with credential parameters masked.
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }
}

/// Status and raw body of an appliance response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Failures below the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call exceeded its time budget.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection refused, DNS failure, reset, etc.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Perform one request, return the body or a transport fault.
///
/// Implementations must not retry: operational commands are not
/// guaranteed to be idempotent on the appliance.
pub trait Transport {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

// ── reqwest implementation ───────────────────────────────────────────

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build the underlying client from a `TransportConfig`.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        Ok(Self {
            http: config.build_client()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        debug!("GET {}", request.redacted_url());

        let mut builder = self.http.get(request.url.clone()).timeout(request.timeout);
        if let Some(ref key) = request.api_key {
            builder = builder.header(API_KEY_HEADER, key.expose());
        }

        // reqwest timeouts never surface as `Http`; they carry the budget.
        let timeout_secs = request.timeout.as_secs();
        let on_err = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout { timeout_secs }
            } else {
                TransportError::Http(e)
            }
        };

        let resp = builder.send().await.map_err(on_err)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(on_err)?;

        trace!(status, bytes = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }
}

fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if REDACTED_PARAMS.contains(&k.as_ref()) {
                "*****".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return shown.to_string();
    }
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn request(url: &str) -> ApiRequest {
        ApiRequest {
            url: Url::parse(url).unwrap(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn redacts_password_but_keeps_other_params() {
        let req = request("https://lan1/api/?type=keygen&user=admin&password=hunter2");
        let shown = req.redacted_url();
        assert!(!shown.contains("hunter2"), "{shown}");
        assert!(shown.contains("user=admin"));
        assert!(shown.contains("type=keygen"));
    }

    #[test]
    fn query_decodes_values() {
        let mut url = Url::parse("https://lan1/api/").unwrap();
        url.query_pairs_mut()
            .append_pair("type", "op")
            .append_pair("cmd", "<show><arp>all</arp></show>");
        let req = ApiRequest {
            url,
            api_key: None,
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            req.query("cmd").as_deref(),
            Some("<show><arp>all</arp></show>")
        );
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn default_config_accepts_self_signed() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.tls, TlsMode::DangerAcceptInvalid);
        assert!(cfg.build_client().is_ok());
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..TransportConfig::default()
        };
        assert!(matches!(cfg.build_client(), Err(TransportError::Tls(_))));
    }
}
