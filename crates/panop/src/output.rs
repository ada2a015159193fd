//! Output: raw responses on stdout, verbose diagnostics, response logs.

use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use tracing::warn;

use panop_core::{OpCommand, OpOutcome, SessionKey, Target};

/// Color only on an interactive stdout, and never with `NO_COLOR` set.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Writes everything the user sees on stdout.
pub struct Printer {
    verbose: bool,
    color: bool,
}

impl Printer {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: should_color(),
        }
    }

    fn label(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_owned()
        }
    }

    fn line(&self, text: impl Display) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
    }

    // ── Verbose diagnostics ──────────────────────────────────────────

    /// Token counts and the classification result.
    pub fn classification(&self, target: &Target, command: &OpCommand) {
        if !self.verbose {
            return;
        }
        let c = command.classified();
        self.line(format!(
            "{} {}  |  {} {}  |  {} {}",
            self.label("API_Cmd_words:"),
            c.structural_count(),
            self.label("FWName:"),
            target,
            self.label("LastIsVal:"),
            c.has_literal(),
        ));
        self.line(format!("{} {}", self.label("APICMD:"), command));
    }

    pub fn session_key(&self, key: &SessionKey) {
        if self.verbose {
            self.line(format!("{} {}", self.label("KEY:"), key.expose()));
        }
    }

    // ── Responses ────────────────────────────────────────────────────

    /// The raw response; in verbose mode preceded by the request URL.
    pub fn response(&self, command: &OpCommand, outcome: &OpOutcome, batch: bool) {
        if self.verbose {
            self.line(format!("{} {}", self.label("CMD:"), outcome.url));
        } else if batch {
            self.line(self.label(&format!("==> {}", command.words().join(" "))));
        }
        self.line(outcome.body.trim());
    }

    /// A failed command inside a batch; the batch keeps going.
    pub fn failure(&self, command: &OpCommand, err: &dyn Display) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}: {err}", command.words().join(" "));
    }
}

/// Response files for one run, `dir/{target}/{slug}.txt`.
///
/// Commands whose slugs collide within the run (`ethernet1/1` and
/// `ethernet1-1` both become `ethernet1-1`) get `_2`, `_3`, ... appended
/// rather than overwriting an earlier response. Files from previous runs
/// are replaced.
pub struct ResponseLog {
    dir: PathBuf,
    written: HashSet<String>,
}

impl ResponseLog {
    pub fn new(dir: &Path, target: &Target) -> Self {
        Self {
            dir: dir.join(target.as_str()),
            written: HashSet::new(),
        }
    }

    /// Write the request URL and raw body; returns the file written.
    pub fn write(&mut self, command: &OpCommand, outcome: &OpOutcome) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let slug = command.slug();
        let mut name = slug.clone();
        let mut n = 1;
        while !self.written.insert(name.clone()) {
            n += 1;
            name = format!("{slug}_{n}");
        }
        if n > 1 {
            warn!(slug = %slug, file = %name, "response log name already used in this run");
        }

        let path = self.dir.join(format!("{name}.txt"));
        fs::write(&path, format!("CMD: {}\n{}\n\n", outcome.url, outcome.body.trim()))?;
        Ok(path)
    }
}
