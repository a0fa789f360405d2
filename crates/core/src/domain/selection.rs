use crate::domain::asset::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of assets under evaluation. Membership only; ordering for display and suggestion
/// lookup comes from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<AssetId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership; returns whether the asset is selected afterwards.
    pub fn toggle(&mut self, asset: AssetId) -> bool {
        if self.0.remove(&asset) {
            false
        } else {
            self.0.insert(asset);
            true
        }
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.0.contains(asset)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.0.iter()
    }
}

impl FromIterator<AssetId> for Selection {
    fn from_iter<I: IntoIterator<Item = AssetId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a AssetId;
    type IntoIter = std::collections::btree_set::Iter<'a, AssetId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut s = Selection::new();
        assert!(s.toggle(AssetId::new("DOT")));
        assert!(s.contains(&AssetId::new("DOT")));
        assert!(!s.toggle(AssetId::new("DOT")));
        assert!(s.is_empty());
    }

    #[test]
    fn no_duplicates() {
        let s: Selection = ["DOT", "dot", "KSM"].into_iter().map(AssetId::new).collect();
        assert_eq!(s.len(), 2);
    }
}
