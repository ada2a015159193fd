//! Configuration for panop.
//!
//! TOML file + `PANOP_*` environment via figment, and the credential chain
//! that turns them into a username and secret: env var, system keyring,
//! a two-line `.creds` file, then plaintext in the config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use panop_core::{ConnectOptions, Credentials, TagClosing, TlsMode, TransportConfig};

/// Keyring service name; entries are keyed `{username}/password`.
pub const KEYRING_SERVICE: &str = "panop";

/// Creds file looked up in the working directory when none is configured.
pub const DEFAULT_CREDS_FILE: &str = ".creds";

const USERNAME_ENV: &str = "PANOP_USERNAME";
const PASSWORD_ENV: &str = "PANOP_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no username configured")]
    NoUsername,

    #[error("no password found for user '{username}'")]
    NoPassword { username: String },

    #[error("credentials file {}: {reason}", .path.display())]
    CredsFile { path: PathBuf, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Appliance account name.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring, env var, or a creds file).
    pub password: Option<String>,

    /// Two-line credentials file: username, then password.
    pub creds_file: Option<PathBuf>,

    /// Whether to consult the system keyring for the password.
    #[serde(default = "default_true")]
    pub keyring: bool,

    /// Keygen call budget in seconds.
    #[serde(default = "default_keygen_timeout")]
    pub keygen_timeout: u64,

    /// Operational command budget in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed appliance certificates.
    #[serde(default = "default_true")]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Directory for per-command response logs.
    pub log_dir: Option<PathBuf>,

    /// Closing-tag policy: "balanced" or "omit-outermost".
    #[serde(default = "default_closing")]
    pub closing: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            creds_file: None,
            keyring: true,
            keygen_timeout: default_keygen_timeout(),
            timeout: default_timeout(),
            insecure: true,
            ca_cert: None,
            log_dir: None,
            closing: default_closing(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_keygen_timeout() -> u64 {
    15
}
fn default_timeout() -> u64 {
    30
}
fn default_closing() -> String {
    TagClosing::Balanced.to_string()
}

impl Config {
    /// Parsed closing-tag policy.
    pub fn closing(&self) -> Result<TagClosing, ConfigError> {
        self.closing
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "closing".into(),
                reason: format!(
                    "expected 'balanced' or 'omit-outermost', got '{}'",
                    self.closing
                ),
            })
    }

    pub fn keygen_timeout(&self) -> Duration {
        Duration::from_secs(self.keygen_timeout)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// TLS and connect settings for the HTTP transport.
    pub fn transport(&self) -> TransportConfig {
        let tls = if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            connect_timeout: self.keygen_timeout(),
        }
    }

    /// Everything `Session::connect` needs besides credentials.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            transport: self.transport(),
            keygen_timeout: self.keygen_timeout(),
            op_timeout: self.op_timeout(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "panop", "panop").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("panop");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!("loading config from {}", path.display());

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PANOP_").only(&[
            "username",
            "creds_file",
            "keyring",
            "keygen_timeout",
            "timeout",
            "insecure",
            "ca_cert",
            "log_dir",
            "closing",
        ]));

    let config: Config = figment.extract()?;
    config.closing()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Username and password parsed from a two-line creds file.
fn read_creds_file(path: &Path) -> Result<(String, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CredsFile {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;

    let mut lines = content.lines().map(str::trim);
    let user = lines.next().unwrap_or_default();
    let pass = lines.next().unwrap_or_default();

    if user.is_empty() || pass.is_empty() {
        return Err(ConfigError::CredsFile {
            path: path.to_owned(),
            reason: "must contain a username line and a password line".into(),
        });
    }
    Ok((user.to_owned(), pass.to_owned()))
}

/// The creds file to use: the configured one, else `./.creds` if present.
fn creds_file(config: &Config) -> Option<PathBuf> {
    if let Some(ref path) = config.creds_file {
        return Some(path.clone());
    }
    let local = PathBuf::from(DEFAULT_CREDS_FILE);
    local.is_file().then_some(local)
}

/// Resolve the username: env var, config, then the creds file's first line.
pub fn resolve_username(config: &Config) -> Result<String, ConfigError> {
    if let Ok(user) = std::env::var(USERNAME_ENV) {
        if !user.trim().is_empty() {
            return Ok(user.trim().to_owned());
        }
    }

    if let Some(ref user) = config.username {
        return Ok(user.clone());
    }

    if let Some(path) = creds_file(config) {
        let (user, _) = read_creds_file(&path)?;
        return Ok(user);
    }

    Err(ConfigError::NoUsername)
}

/// Resolve the password for `username`.
///
/// 1. `PANOP_PASSWORD`
/// 2. System keyring (`panop`, `{username}/password`), if enabled
/// 3. Creds file second line
/// 4. Plaintext `password` in config
pub fn resolve_password(config: &Config, username: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if config.keyring {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{username}/password")) {
            if let Ok(pw) = entry.get_password() {
                debug!("password resolved from keyring");
                return Ok(SecretString::from(pw));
            }
        }
    }

    // 3. Creds file
    if let Some(path) = creds_file(config) {
        let (_, pw) = read_creds_file(&path)?;
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = config.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        username: username.into(),
    })
}

/// Resolve both halves of the credentials.
pub fn resolve_credentials(config: &Config) -> Result<Credentials, ConfigError> {
    let username = resolve_username(config)?;
    let password = resolve_password(config, &username)?;
    Ok(Credentials::new(username, password))
}
