use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Substrings, one of which every appliance name must contain.
const ZONE_MARKERS: &[&str] = &["lan", "wan"];

/// A validated appliance name.
///
/// The name must contain `lan` or `wan` in any case. Validation happens
/// before any network activity; a `Target` is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Trim and validate a raw target identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let name = raw.trim();
        let lower = name.to_lowercase();

        if ZONE_MARKERS.iter().any(|m| lower.contains(m)) {
            Ok(Self(name.to_owned()))
        } else {
            Err(CoreError::InvalidTarget {
                target: name.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Target {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn accepts_lan_and_wan_in_any_case() {
        for name in ["Lan1", "wan-edge", "BackboneWAN", "fw-lan-01.corp"] {
            assert_eq!(Target::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn rejects_names_without_marker() {
        let err = Target::parse("core-switch").unwrap_err();
        match err {
            CoreError::InvalidTarget { target } => assert_eq!(target, "core-switch"),
            other => panic!("expected InvalidTarget, got {other:?}"),
        }
    }

    #[test]
    fn trims_before_validating() {
        assert_eq!(Target::parse("  lan1 \n").unwrap().to_string(), "lan1");
        assert!(Target::parse("   ").is_err());
    }

    #[test]
    fn parses_via_from_str() {
        let t: Target = "edge-WAN2".parse().unwrap();
        assert_eq!(t.as_ref(), "edge-WAN2");
    }
}
