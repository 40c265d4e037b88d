//! Identifier quoting policy

use serde::{Deserialize, Serialize};

/// Policy controlling whether emitted identifiers are quoted
///
/// Session-scoped on a connection: generation forces [`QuotingMode::QuoteAll`]
/// for its duration and restores the original value on every exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotingMode {
    /// Quote only identifiers that require it
    #[default]
    Legacy,

    /// Quote every identifier
    QuoteAll,
}

impl QuotingMode {
    /// Wrap an identifier according to the policy
    ///
    /// Under `QuoteAll`, embedded quotes are doubled so the emitted
    /// identifier round-trips.
    pub fn quote(&self, identifier: &str) -> String {
        match self {
            Self::Legacy => identifier.to_string(),
            Self::QuoteAll => format!("\"{}\"", identifier.replace('"', "\"\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_passes_through() {
        assert_eq!(QuotingMode::Legacy.quote("users"), "users");
    }

    #[test]
    fn quote_all_wraps_and_escapes() {
        assert_eq!(QuotingMode::QuoteAll.quote("users"), "\"users\"");
        assert_eq!(QuotingMode::QuoteAll.quote("we\"ird"), "\"we\"\"ird\"");
    }
}
