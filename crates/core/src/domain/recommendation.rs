use crate::domain::asset::AssetId;
use crate::domain::protocol::Protocol;
use serde::{Deserialize, Serialize};

/// Best protocol for one selected asset; `best` is `None` when the asset has no candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPick {
    pub asset: AssetId,
    pub best: Option<Protocol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// In canonical (catalog) order.
    pub picks: Vec<AssetPick>,
    pub suggestion: String,
}

impl Recommendation {
    pub fn best_for(&self, asset: &AssetId) -> Option<&Protocol> {
        self.picks
            .iter()
            .find(|pick| &pick.asset == asset)
            .and_then(|pick| pick.best.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}
