// Token classification
//
// Operational commands often end in a filter value (an address, a range,
// a dashed interface name, or `all`). That one trailing token is emitted
// bare instead of being wrapped in a tag.

/// The one whole-word literal value.
const ALL: &str = "all";

/// Whether `token` is a literal value rather than a command word.
///
/// True when it contains `-` or `.`, or is exactly `all` (case-sensitive).
pub fn is_literal_value(token: &str) -> bool {
    token.contains('-') || token.contains('.') || token == ALL
}

/// Command words split into structural tokens and an optional trailing value.
///
/// At most one token, the last, is ever a literal value. Every token is
/// trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedCommand {
    structural: Vec<String>,
    literal: Option<String>,
}

impl ClassifiedCommand {
    /// Tokens rendered as nested tags, outermost first.
    pub fn structural(&self) -> &[String] {
        &self.structural
    }

    /// The bare trailing value, if the last token was classified as one.
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    pub fn has_literal(&self) -> bool {
        self.literal.is_some()
    }

    /// Number of tokens that become tags.
    pub fn structural_count(&self) -> usize {
        self.structural.len()
    }
}

/// Classify command words (target and mode flags already removed).
///
/// A lone value token with no command words yields an empty structural
/// list; the compiled command is then just the bare value.
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> ClassifiedCommand {
    let mut structural: Vec<String> = tokens
        .iter()
        .map(|t| t.as_ref().trim().to_owned())
        .collect();

    let literal = match structural.last() {
        Some(last) if is_literal_value(last) => structural.pop(),
        _ => None,
    };

    ClassifiedCommand {
        structural,
        literal,
    }
}
