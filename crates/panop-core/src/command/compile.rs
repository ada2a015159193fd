// Command compilation
//
// Structural tokens become nested tags, outermost first; the literal value
// sits bare after the innermost opening tag. No escaping and no tag-name
// validation: tokens are emitted verbatim.

use strum::{Display, EnumString};

use super::classify::ClassifiedCommand;

/// Which closing tags the compiled command carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum TagClosing {
    /// Close every opened tag, innermost first.
    /// `[a, b, c]` compiles to `<a><b><c></c></b></a>`.
    #[default]
    Balanced,
    /// Close every tag except the outermost one.
    /// `[a, b, c]` compiles to `<a><b><c></c></b>`.
    OmitOutermost,
}

/// Render a classified command as a single nested-tag string.
pub fn compile(command: &ClassifiedCommand, closing: TagClosing) -> String {
    let tokens = command.structural();

    let skip = match closing {
        TagClosing::Balanced => 0,
        TagClosing::OmitOutermost => 1,
    };

    let opening = tokens.iter().map(|t| format!("<{t}>"));
    let literal = command.literal().map(str::to_owned);
    let closing = tokens.iter().skip(skip).rev().map(|t| format!("</{t}>"));

    opening.chain(literal).chain(closing).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::command::classify::classify;

    fn compiled(tokens: &[&str], closing: TagClosing) -> String {
        compile(&classify(tokens), closing)
    }

    #[test]
    fn balanced_nesting_without_value() {
        assert_eq!(
            compiled(&["a", "b", "c"], TagClosing::Balanced),
            "<a><b><c></c></b></a>"
        );
    }

    #[test]
    fn omit_outermost_leaves_first_tag_open() {
        assert_eq!(
            compiled(&["a", "b", "c"], TagClosing::OmitOutermost),
            "<a><b><c></c></b>"
        );
    }

    #[test]
    fn value_sits_after_innermost_open_tag() {
        assert_eq!(
            compiled(&["show", "arp", "all"], TagClosing::Balanced),
            "<show><arp>all</arp></show>"
        );
        assert_eq!(
            compiled(&["show", "arp", "all"], TagClosing::OmitOutermost),
            "<show><arp>all</arp>"
        );
    }

    // The shorthand `<show><arp>all` (no closing tags at all) is never
    // produced: closing follows the tag rule, and the default sends the
    // fully balanced form.
    #[test]
    fn show_arp_all_keeps_the_inner_close_tag() {
        let omit = compiled(&["show", "arp", "all"], TagClosing::OmitOutermost);
        assert_eq!(omit, "<show><arp>all</arp>");
        assert_ne!(omit, "<show><arp>all");
        assert_eq!(
            compiled(&["show", "arp", "all"], TagClosing::default()),
            "<show><arp>all</arp></show>"
        );
    }

    #[test]
    fn ranges_and_addresses_are_inserted_verbatim() {
        assert_eq!(
            compiled(
                &["test", "routing", "fib-lookup", "virtual-router", "10.1.1.1"],
                TagClosing::Balanced
            ),
            "<test><routing><fib-lookup><virtual-router>10.1.1.1</virtual-router></fib-lookup></routing></test>"
        );
    }

    #[test]
    fn single_word_command() {
        assert_eq!(compiled(&["show"], TagClosing::Balanced), "<show></show>");
        assert_eq!(compiled(&["show"], TagClosing::OmitOutermost), "<show>");
    }

    #[test]
    fn lone_value_degenerates_to_bare_literal() {
        assert_eq!(compiled(&["all"], TagClosing::Balanced), "all");
        assert_eq!(compiled(&["10.0.0.1"], TagClosing::OmitOutermost), "10.0.0.1");
    }

    #[test]
    fn no_escaping_is_applied() {
        assert_eq!(
            compiled(&["show", "a&b"], TagClosing::Balanced),
            "<show><a&b></a&b></show>"
        );
    }

    #[test]
    fn closing_parses_from_kebab_case() {
        assert_eq!("balanced".parse::<TagClosing>(), Ok(TagClosing::Balanced));
        assert_eq!(
            "omit-outermost".parse::<TagClosing>(),
            Ok(TagClosing::OmitOutermost)
        );
        assert!("sometimes".parse::<TagClosing>().is_err());
        assert_eq!(TagClosing::OmitOutermost.to_string(), "omit-outermost");
    }
}
