use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticker-style asset identifier, e.g. `DOT`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub const DOT: &'static str = "DOT";
    pub const USDC: &'static str = "USDC";
    pub const KSM: &'static str = "KSM";

    /// Trims and upper-cases; identifiers are matched exactly after that.
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a comma separated list such as `DOT, usdc`. Empty parts are skipped.
    pub fn parse_list(s: &str) -> Vec<AssetId> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(AssetId::new)
            .collect()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        AssetId::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub id: AssetId,
    pub name: String,
    pub description: String,
}
