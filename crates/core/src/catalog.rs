use crate::domain::asset::{AssetId, AssetInfo};
use crate::domain::protocol::Protocol;
use crate::error::UnknownAssetError;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

pub const FALLBACK_SUGGESTION: &str =
    "Consider diversifying your assets across multiple protocols to balance risk and yield.";

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub info: AssetInfo,
    pub protocols: Vec<Protocol>,
}

/// Read-only asset → candidate protocol table, plus the canned suggestion texts.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    suggestions: BTreeMap<String, String>,
    fallback_suggestion: String,
}

impl Catalog {
    /// Unchecked constructor; seed files go through [`crate::domain::contract::parse_seed`].
    pub fn new(
        entries: Vec<CatalogEntry>,
        suggestions: BTreeMap<String, String>,
        fallback_suggestion: String,
    ) -> Self {
        Self {
            entries,
            suggestions,
            fallback_suggestion,
        }
    }

    pub(crate) fn set_suggestions(&mut self, suggestions: BTreeMap<String, String>) {
        self.suggestions = suggestions;
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog seed {}", path.display()))?;
        let catalog = crate::domain::contract::parse_seed(&text)
            .with_context(|| format!("invalid catalog seed {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            assets = catalog.entries.len(),
            suggestions = catalog.suggestions.len(),
            "loaded catalog seed"
        );
        Ok(catalog)
    }

    /// The demo data set: DOT, USDC and KSM with four protocols each.
    pub fn builtin() -> Self {
        let entries = vec![
            CatalogEntry {
                info: info(AssetId::DOT, "Polkadot", "The native token of the Polkadot network"),
                protocols: vec![
                    Protocol::new("Moonbeam Stake", 12.0, 0.1, 0, 1),
                    Protocol::new("Acala Swap", 8.0, 0.05, 7, 2),
                    Protocol::new("Parallel Finance", 15.0, 0.2, 30, 3),
                    Protocol::new("Equilibrium", 10.0, 0.08, 14, 2),
                ],
            },
            CatalogEntry {
                info: info(AssetId::USDC, "USD Coin", "A fully collateralized US dollar stablecoin"),
                protocols: vec![
                    Protocol::new("Astar Lend", 5.0, 0.02, 0, 1),
                    Protocol::new("Liquid Pool", 7.0, 0.15, 30, 3),
                    Protocol::new("Moonbeam USDC", 6.5, 0.07, 7, 2),
                    Protocol::new("Acala Stablecoin", 4.8, 0.01, 0, 1),
                ],
            },
            CatalogEntry {
                info: info(AssetId::KSM, "Kusama", "Polkadot's canary network token"),
                protocols: vec![
                    Protocol::new("Karura Yield", 18.0, 0.2, 30, 4),
                    Protocol::new("Shiden Stake", 14.0, 0.12, 7, 3),
                    Protocol::new("Moonriver Vault", 16.0, 0.15, 14, 3),
                    Protocol::new("KSM Liquid", 10.0, 0.05, 0, 2),
                ],
            },
        ];

        let suggestions = [
            ("DOT", "Consider staking DOT directly on Moonbeam for steady, low-risk yield with no lockup period. Great for beginners."),
            ("USDC", "Astar Lend offers the best balance of yield and safety for your USDC with immediate withdrawal options."),
            ("KSM", "For KSM, the higher APY on Karura comes with increased risk - consider splitting between Karura and a lower-risk option."),
            ("DOT,USDC", "Split your portfolio with 70% DOT on Moonbeam for higher yield and 30% USDC on Astar for stability and liquidity."),
            ("DOT,KSM", "Leverage the correlation between DOT and KSM by pairing Moonbeam staking with KSM Liquid for a balanced risk profile."),
            ("USDC,KSM", "Balance the volatility of KSM with stable USDC positions. Consider Moonriver for KSM and Astar for USDC."),
            ("DOT,USDC,KSM", "Diversify across all three assets: stake DOT on Moonbeam (50%), provide USDC on Astar (30%), and place KSM in KSM Liquid (20%) for an optimized risk-reward balance."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self::new(entries, suggestions, FALLBACK_SUGGESTION.to_string())
    }

    pub fn protocols(&self, asset: &AssetId) -> Result<&[Protocol], UnknownAssetError> {
        self.entries
            .iter()
            .find(|e| &e.info.id == asset)
            .map(|e| e.protocols.as_slice())
            .ok_or_else(|| UnknownAssetError {
                asset: asset.clone(),
            })
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    pub fn asset(&self, asset: &AssetId) -> Option<&AssetInfo> {
        self.assets().find(|info| &info.id == asset)
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.position(asset).is_some()
    }

    pub fn position(&self, asset: &AssetId) -> Option<usize> {
        self.entries.iter().position(|e| &e.info.id == asset)
    }

    /// Catalog order first, then identifiers the catalog does not know, lexicographically.
    pub fn canonical_order<'a>(&self, ids: impl IntoIterator<Item = &'a AssetId>) -> Vec<&'a AssetId> {
        let mut out: Vec<&AssetId> = ids.into_iter().collect();
        out.sort_by(|a, b| {
            let pa = self.position(a).unwrap_or(usize::MAX);
            let pb = self.position(b).unwrap_or(usize::MAX);
            pa.cmp(&pb).then_with(|| a.cmp(b))
        });
        out.dedup();
        out
    }

    pub fn canonical_key<'a>(&self, ids: impl IntoIterator<Item = &'a AssetId>) -> String {
        self.canonical_order(ids)
            .into_iter()
            .map(AssetId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn suggestion_for_key(&self, key: &str) -> Option<&str> {
        self.suggestions.get(key).map(String::as_str)
    }

    pub fn fallback_suggestion(&self) -> &str {
        &self.fallback_suggestion
    }
}

fn info(id: &str, name: &str, description: &str) -> AssetInfo {
    AssetInfo {
        id: AssetId::new(id),
        name: name.to_string(),
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_assets_in_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog.assets().map(|a| a.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["DOT", "USDC", "KSM"]);
        for info in catalog.assets() {
            assert_eq!(catalog.protocols(&info.id).unwrap().len(), 4);
        }
    }

    #[test]
    fn unknown_asset_is_an_error() {
        let catalog = Catalog::builtin();
        let err = catalog.protocols(&AssetId::new("ETH")).unwrap_err();
        assert_eq!(err.asset, AssetId::new("ETH"));
        assert_eq!(err.to_string(), "unknown asset: ETH");
    }

    #[test]
    fn canonical_key_uses_catalog_order() {
        let catalog = Catalog::builtin();
        let ids = [AssetId::new("KSM"), AssetId::new("DOT"), AssetId::new("USDC")];
        assert_eq!(catalog.canonical_key(ids.iter()), "DOT,USDC,KSM");

        let with_unknown = [AssetId::new("ETH"), AssetId::new("KSM"), AssetId::new("ATOM")];
        assert_eq!(catalog.canonical_key(with_unknown.iter()), "KSM,ATOM,ETH");
    }

    #[test]
    fn every_non_empty_subset_has_a_suggestion() {
        let catalog = Catalog::builtin();
        let ids: Vec<AssetId> = catalog.assets().map(|a| a.id.clone()).collect();
        for mask in 1u32..(1 << ids.len()) {
            let subset: Vec<&AssetId> = ids
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| id)
                .collect();
            let key = catalog.canonical_key(subset);
            assert!(catalog.suggestion_for_key(&key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn bundled_seed_file_matches_builtin() {
        let text = include_str!("../seed/catalog.json");
        let parsed = crate::domain::contract::parse_seed(text).unwrap();
        assert_eq!(parsed, Catalog::builtin());
    }
}
