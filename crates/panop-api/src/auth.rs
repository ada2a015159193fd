use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Marker preceding (and terminating) the key in a keygen response:
/// `<response status="success"><result><key>...</key></result></response>`.
const KEY_MARKER: &str = "key>";

/// Username and secret exchanged for a session key.
///
/// Neither field is ever logged or placed in a compiled command.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Short-lived access key issued by the appliance's keygen endpoint.
///
/// Only [`ApplianceClient::acquire_session_key`](crate::ApplianceClient::acquire_session_key)
/// produces one outside of tests, so holding a `SessionKey` means key
/// acquisition succeeded. It lives for one process run and is never persisted.
#[derive(Clone)]
pub struct SessionKey(SecretString);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// The raw key, for the request header and verbose diagnostics.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

/// Pull the key out of a keygen response body.
///
/// Takes the text between the first `key>` marker and the next `<`, then
/// drops any stray angle brackets or slashes at its edges and trims
/// whitespace. This is not an XML parser; it assumes the usual envelope.
/// Returns `None` when the marker is absent or the key is empty.
pub fn extract_key(body: &str) -> Option<String> {
    let (_, after) = body.split_once(KEY_MARKER)?;
    let raw = after.split('<').next().unwrap_or_default();
    let key = raw
        .trim()
        .trim_matches(|c| c == '<' || c == '>' || c == '/')
        .trim();

    if key.is_empty() {
        None
    } else {
        Some(key.to_owned())
    }
}

/// First `len` characters of a body, for error messages.
pub(crate) fn preview(body: &str, len: usize) -> String {
    body.chars().take(len).collect()
}
