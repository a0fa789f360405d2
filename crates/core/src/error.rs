use crate::domain::asset::AssetId;
use std::fmt;

/// Lookup of an asset identifier the catalog does not know.
///
/// The asset set is closed, so this is a caller bug rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAssetError {
    pub asset: AssetId,
}

impl fmt::Display for UnknownAssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown asset: {}", self.asset)
    }
}

impl std::error::Error for UnknownAssetError {}
