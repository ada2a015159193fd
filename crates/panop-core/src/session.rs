// ── Session ──
//
// Owns the client and the session key for one process run. Opening a
// session is the only way to get a key, so a failed key acquisition can
// never reach the execution step. Keys are never written anywhere.

use std::time::Duration;

use tracing::debug;

use panop_api::{
    ApplianceClient, Credentials, DEFAULT_KEYGEN_TIMEOUT, DEFAULT_OP_TIMEOUT, HttpTransport,
    SessionKey, Step, Transport, TransportConfig,
};

use crate::command::OpCommand;
use crate::error::CoreError;
use crate::target::Target;

/// How to reach an appliance over HTTPS.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub transport: TransportConfig,
    pub keygen_timeout: Duration,
    pub op_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            keygen_timeout: DEFAULT_KEYGEN_TIMEOUT,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }
}

/// What one executed command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpOutcome {
    /// The request URL (no credentials; the key travels in a header).
    pub url: String,
    /// Raw response body, unmodified.
    pub body: String,
}

/// An authenticated session against one appliance.
#[derive(Debug)]
pub struct Session<T> {
    client: ApplianceClient<T>,
    key: SessionKey,
}

impl<T: Transport> Session<T> {
    /// Acquire a fresh session key.
    pub async fn open(client: ApplianceClient<T>, credentials: &Credentials) -> Result<Self, CoreError> {
        let key = client.acquire_session_key(credentials).await?;
        Ok(Self { client, key })
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn client(&self) -> &ApplianceClient<T> {
        &self.client
    }

    /// Execute one command. Single attempt, no retry.
    pub async fn run(&self, command: &OpCommand) -> Result<OpOutcome, CoreError> {
        debug!(target_host = self.client.target(), words = ?command.words(), "running command");
        let reply = self.client.execute(&self.key, command.as_str()).await?;

        Ok(OpOutcome {
            url: reply.url,
            body: reply.body,
        })
    }
}

impl Session<HttpTransport> {
    /// Build the HTTPS transport for `target` and acquire a key.
    pub async fn connect(
        target: &Target,
        options: &ConnectOptions,
        credentials: &Credentials,
    ) -> Result<Self, CoreError> {
        let transport =
            HttpTransport::new(&options.transport).map_err(|e| CoreError::ConnectionFailed {
                target: target.to_string(),
                step: Step::Keygen,
                reason: e.to_string(),
            })?;

        let client = ApplianceClient::for_host(target.as_str(), transport)?
            .with_keygen_timeout(options.keygen_timeout)
            .with_op_timeout(options.op_timeout);

        Self::open(client, credentials).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use panop_api::{ApiRequest, ApiResponse, TransportError};

    use super::*;
    use crate::command::TagClosing;

    #[derive(Debug, Default)]
    struct Scripted {
        bodies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn new(bodies: &[&str]) -> Self {
            Self {
                bodies: Mutex::new(bodies.iter().map(|b| (*b).to_owned()).collect()),
                seen: Mutex::default(),
            }
        }
    }

    impl Transport for Scripted {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            let body = self.bodies.lock().unwrap().pop_front().unwrap_or_default();
            Ok(ApiResponse { status: 200, body })
        }
    }

    const KEYGEN: &str = "<response status=\"success\"><result><key>K3Y</key></result></response>";

    fn creds() -> Credentials {
        Credentials::new("admin", "pw".to_owned())
    }

    #[tokio::test]
    async fn end_to_end_show_arp_all() {
        let argv = ["lan1", "show", "arp", "all"];

        let target = Target::parse(argv[0]).unwrap();
        let command = OpCommand::build(&argv[1..], TagClosing::Balanced);
        assert_eq!(command.classified().structural(), ["show", "arp"]);
        assert_eq!(command.classified().literal(), Some("all"));
        // Balanced is what goes on the wire by default, not `<show><arp>all`.
        assert_eq!(command.as_str(), "<show><arp>all</arp></show>");

        let transport = Scripted::new(&[KEYGEN, "<response status=\"success\"/>"]);
        let client = ApplianceClient::for_host(target.as_str(), transport).unwrap();
        let session = Session::open(client, &creds()).await.unwrap();
        assert_eq!(session.key().expose(), "K3Y");

        let outcome = session.run(&command).await.unwrap();
        assert_eq!(outcome.body, "<response status=\"success\"/>");

        let seen = session.client().transport().seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].query("type").as_deref(), Some("keygen"));
        assert_eq!(seen[1].query("type").as_deref(), Some("op"));
        assert_eq!(
            seen[1].query("cmd").as_deref(),
            Some("<show><arp>all</arp></show>")
        );
        assert_eq!(seen[1].api_key.as_ref().map(SessionKey::expose), Some("K3Y"));
    }

    #[tokio::test]
    async fn literal_closing_variant_is_sent_verbatim() {
        let command = OpCommand::build(&["show", "arp", "all"], TagClosing::OmitOutermost);
        let transport = Scripted::new(&[KEYGEN, "ok"]);
        let client = ApplianceClient::for_host("wan-edge", transport).unwrap();
        let session = Session::open(client, &creds()).await.unwrap();

        session.run(&command).await.unwrap();

        let seen = session.client().transport().seen.lock().unwrap().clone();
        assert_eq!(seen[1].query("cmd").as_deref(), Some("<show><arp>all</arp>"));
    }

    #[tokio::test]
    async fn empty_keygen_body_fails_to_open() {
        let transport = Scripted::new(&[""]);
        let client = ApplianceClient::for_host("lan1", transport).unwrap();

        let err = Session::open(client, &creds()).await.unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn outcome_url_never_contains_key() {
        let transport = Scripted::new(&[KEYGEN, "ok"]);
        let client = ApplianceClient::for_host("lan1", transport).unwrap();
        let session = Session::open(client, &creds()).await.unwrap();

        let outcome = session
            .run(&OpCommand::from_line("show clock", TagClosing::Balanced))
            .await
            .unwrap();
        assert!(outcome.url.starts_with("https://lan1/api/?type=op&cmd="));
        assert!(!outcome.url.contains("K3Y"));
    }
}
