//! CLI-side config: flag overrides on top of the loaded file, batch files,
//! and the interactive password fallback.

use std::io::{self, IsTerminal};
use std::path::Path;

use secrecy::SecretString;

use panop_config::{Config, ConfigError};
use panop_core::{Credentials, OpCommand, TagClosing};

use crate::cli::{Cli, ClosingMode};
use crate::error::CliError;

impl From<ClosingMode> for TagClosing {
    fn from(mode: ClosingMode) -> Self {
        match mode {
            ClosingMode::Balanced => Self::Balanced,
            ClosingMode::OmitOutermost => Self::OmitOutermost,
        }
    }
}

/// The config file (explicit `--config` or the platform default) plus env.
pub fn load(cli: &Cli) -> Result<Config, CliError> {
    let config = match cli.config {
        Some(ref path) => panop_config::load_config_from(path)?,
        None => panop_config::load_config()?,
    };
    Ok(config)
}

/// Flags win over file and environment.
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(secs) = cli.timeout {
        config.timeout = secs;
    }
    if let Some(mode) = cli.closing {
        config.closing = TagClosing::from(mode).to_string();
    }
    if let Some(ref dir) = cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
}

/// Commands to run: the positional words, or one per non-blank line of `--file`.
pub fn commands(cli: &Cli, closing: TagClosing) -> Result<Vec<OpCommand>, CliError> {
    match cli.file {
        Some(ref path) => read_batch(path, closing),
        None => Ok(vec![OpCommand::build(&cli.words, closing)]),
    }
}

fn read_batch(path: &Path, closing: TagClosing) -> Result<Vec<OpCommand>, CliError> {
    let content = std::fs::read_to_string(path)?;
    let commands = parse_batch(&content, closing);
    if commands.is_empty() {
        return Err(CliError::EmptyBatch {
            path: path.display().to_string(),
        });
    }
    Ok(commands)
}

fn parse_batch(content: &str, closing: TagClosing) -> Vec<OpCommand> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| OpCommand::from_line(line, closing))
        .collect()
}

/// Resolve credentials; prompt for a missing password on an interactive terminal.
pub fn credentials(config: &Config) -> Result<Credentials, CliError> {
    match panop_config::resolve_credentials(config) {
        Ok(creds) => Ok(creds),
        Err(ConfigError::NoPassword { username }) if io::stdin().is_terminal() => {
            let password = rpassword::prompt_password(format!("Password for {username}: "))?;
            Ok(Credentials::new(username, SecretString::from(password)))
        }
        Err(e) => Err(e.into()),
    }
}
