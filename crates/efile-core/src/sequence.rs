//! # Sequence Numbers
//!
//! `SeqNumber` is the wire identity carried by every element of a batch
//! document tree. Numbers are assigned by the depth-first sequencer in
//! `efile-batch`; zero means "not yet assigned".

use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A document-tree sequence number.
///
/// Unique within one document tree after sequencing. Serialized as a bare
/// number in the keyed-map format and as a decimal attribute string on XML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeqNumber(pub u64);

impl SeqNumber {
    /// The unassigned sentinel.
    pub const UNASSIGNED: SeqNumber = SeqNumber(0);

    /// The numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Whether the sequencer has assigned this number.
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for SeqNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeqNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(SeqNumber)
    }
}

impl From<u64> for SeqNumber {
    fn from(n: u64) -> Self {
        SeqNumber(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unassigned() {
        let n = SeqNumber::default();
        assert_eq!(n, SeqNumber::UNASSIGNED);
        assert!(!n.is_assigned());
    }

    #[test]
    fn test_display_and_parse() {
        let n: SeqNumber = "42".parse().unwrap();
        assert_eq!(n.value(), 42);
        assert_eq!(n.to_string(), "42");
        assert!(n.is_assigned());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<SeqNumber>().is_err());
        assert!("-1".parse::<SeqNumber>().is_err());
        assert!("1.5".parse::<SeqNumber>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&SeqNumber(7)).unwrap();
        assert_eq!(json, "7");
        let back: SeqNumber = serde_json::from_str("7").unwrap();
        assert_eq!(back, SeqNumber(7));
    }
}
