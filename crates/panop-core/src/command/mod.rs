// ── Operational commands ──
//
// Raw tokens flow forward only: tokens -> `ClassifiedCommand` -> compiled
// string. `OpCommand` holds all three so callers can report any stage.

mod classify;
mod compile;

pub use classify::{ClassifiedCommand, classify, is_literal_value};
pub use compile::{TagClosing, compile};

/// A compiled operational command, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCommand {
    words: Vec<String>,
    classified: ClassifiedCommand,
    compiled: String,
}

impl OpCommand {
    /// Classify and compile command words in one step.
    pub fn build<S: AsRef<str>>(tokens: &[S], closing: TagClosing) -> Self {
        let classified = classify(tokens);
        let compiled = compile(&classified, closing);
        let words = tokens.iter().map(|t| t.as_ref().trim().to_owned()).collect();

        Self {
            words,
            classified,
            compiled,
        }
    }

    /// Parse one whitespace-separated command line, as found in batch files.
    pub fn from_line(line: &str, closing: TagClosing) -> Self {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Self::build(&tokens, closing)
    }

    /// The trimmed input words, in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn classified(&self) -> &ClassifiedCommand {
        &self.classified
    }

    /// The nested-tag string sent as `cmd=`.
    pub fn as_str(&self) -> &str {
        &self.compiled
    }

    /// The input words joined by `_`, used for response log file names.
    /// Path separators inside words become `-`.
    pub fn slug(&self) -> String {
        self.words.join("_").replace(['/', '\\'], "-")
    }
}

impl std::fmt::Display for OpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_keeps_every_stage() {
        let cmd = OpCommand::build(&["show", "arp", "all"], TagClosing::Balanced);
        assert_eq!(cmd.words(), ["show", "arp", "all"]);
        assert_eq!(cmd.classified().structural(), ["show", "arp"]);
        assert_eq!(cmd.classified().literal(), Some("all"));
        assert_eq!(cmd.as_str(), "<show><arp>all</arp></show>");
        assert_eq!(cmd.to_string(), cmd.as_str());
    }

    #[test]
    fn from_line_splits_on_whitespace() {
        let cmd = OpCommand::from_line("  show   interface\tethernet1-1 ", TagClosing::Balanced);
        assert_eq!(cmd.words(), ["show", "interface", "ethernet1-1"]);
        assert_eq!(
            cmd.as_str(),
            "<show><interface>ethernet1-1</interface></show>"
        );
    }

    #[test]
    fn slug_joins_words() {
        let cmd = OpCommand::from_line("show system info", TagClosing::Balanced);
        assert_eq!(cmd.slug(), "show_system_info");

        let cmd = OpCommand::from_line("show interface ethernet1/1", TagClosing::Balanced);
        assert_eq!(cmd.slug(), "show_interface_ethernet1-1");
    }
}
