// ── Device identity ──
//
// Every watchlist key and save-gate check goes through MacAddress, so a
// device seen as "60-60-1F-AA-BB-CC" and "60:60:1f:aa:bb:cc" is one entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware address, normalized to lowercase colon-separated form
/// (`aa:bb:cc:dd:ee:ff`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized address from any common format.
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dashes_and_case() {
        let mac = MacAddress::new("60-60-1F-AA-BB-CC");
        assert_eq!(mac.as_str(), "60:60:1f:aa:bb:cc");
    }

    #[test]
    fn equal_across_formats() {
        assert_eq!(
            MacAddress::new("60:60:1F:AA:BB:CC"),
            MacAddress::new("60-60-1f-aa-bb-cc")
        );
    }

    #[test]
    fn from_str_and_display() {
        let mac: MacAddress = "AA:BB:CC:11:22:33".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:11:22:33");
    }

    #[test]
    fn empty_stays_empty() {
        assert!(MacAddress::new("  ").is_empty());
    }
}
