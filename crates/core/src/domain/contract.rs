use crate::catalog::{Catalog, CatalogEntry};
use crate::domain::asset::{AssetId, AssetInfo};
use crate::domain::protocol::Protocol;
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// On-disk catalog seed (`CATALOG_PATH`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCatalog {
    pub assets: Vec<SeedAsset>,
    #[serde(default)]
    pub suggestions: BTreeMap<String, String>,
    pub fallback_suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAsset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub protocols: Vec<SeedProtocol>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProtocol {
    pub name: String,
    pub apy: f64,
    pub fee: f64,
    pub lockup: i64,
    pub risk: i64,
}

pub fn parse_seed(text: &str) -> anyhow::Result<Catalog> {
    let parsed = serde_json::from_str::<SeedCatalog>(text)
        .context("catalog seed is not valid JSON for the seed schema")?;
    parsed.validate_and_into_catalog()
}

impl SeedCatalog {
    pub fn validate_and_into_catalog(self) -> anyhow::Result<Catalog> {
        ensure!(!self.assets.is_empty(), "catalog seed must list at least one asset");

        let mut seen_ids = BTreeSet::<AssetId>::new();
        let mut entries = Vec::with_capacity(self.assets.len());
        for asset in self.assets {
            entries.push(asset.validate_and_into_entry(&mut seen_ids)?);
        }

        let fallback_suggestion = self.fallback_suggestion.trim().to_string();
        ensure!(
            !fallback_suggestion.is_empty(),
            "fallback_suggestion must be non-empty"
        );

        let mut catalog = Catalog::new(entries, BTreeMap::new(), fallback_suggestion);

        let mut suggestions = BTreeMap::new();
        for (key, text) in self.suggestions {
            let ids = AssetId::parse_list(&key);
            ensure!(!ids.is_empty(), "suggestion key must name at least one asset");

            let unique: BTreeSet<&AssetId> = ids.iter().collect();
            ensure!(
                unique.len() == ids.len(),
                "suggestion key {key:?} repeats an asset"
            );
            for id in &ids {
                if !catalog.contains(id) {
                    bail!("suggestion key {key:?} names unknown asset {id}");
                }
            }

            // Keys out of canonical order could never be looked up.
            let canonical = catalog.canonical_key(ids.iter());
            ensure!(
                canonical == ids.iter().map(AssetId::as_str).collect::<Vec<_>>().join(","),
                "suggestion key {key:?} is not in catalog order (expected {canonical:?})"
            );

            let text = text.trim().to_string();
            ensure!(!text.is_empty(), "suggestion for {key:?} must be non-empty");
            suggestions.insert(canonical, text);
        }

        catalog.set_suggestions(suggestions);
        Ok(catalog)
    }
}

impl SeedAsset {
    fn validate_and_into_entry(
        self,
        seen_ids: &mut BTreeSet<AssetId>,
    ) -> anyhow::Result<CatalogEntry> {
        let id = AssetId::new(&self.id);
        ensure!(!id.as_str().is_empty(), "asset id must be non-empty");
        ensure!(
            !id.as_str().contains(','),
            "asset id must not contain ',' (got {id})"
        );
        ensure!(seen_ids.insert(id.clone()), "duplicate asset id: {id}");

        let name = self.name.trim().to_string();
        ensure!(!name.is_empty(), "asset {id}: name must be non-empty");

        ensure!(
            !self.protocols.is_empty(),
            "asset {id}: protocol list must be non-empty"
        );

        let mut seen_names = BTreeSet::<String>::new();
        let mut protocols = Vec::with_capacity(self.protocols.len());
        for p in self.protocols {
            protocols.push(
                p.validate_and_into_protocol(&mut seen_names)
                    .with_context(|| format!("asset {id}"))?,
            );
        }

        Ok(CatalogEntry {
            info: AssetInfo {
                id,
                name,
                description: self.description.trim().to_string(),
            },
            protocols,
        })
    }
}

impl SeedProtocol {
    fn validate_and_into_protocol(
        self,
        seen_names: &mut BTreeSet<String>,
    ) -> anyhow::Result<Protocol> {
        let name = self.name.trim().to_string();
        ensure!(!name.is_empty(), "protocol name must be non-empty");
        ensure!(
            seen_names.insert(name.clone()),
            "duplicate protocol name: {name}"
        );

        ensure!(
            self.apy.is_finite() && self.apy >= 0.0,
            "{name}: apy must be a non-negative number (got {})",
            self.apy
        );
        ensure!(
            (0.0..1.0).contains(&self.fee),
            "{name}: fee must be in [0, 1) (got {})",
            self.fee
        );
        let lockup = u32::try_from(self.lockup)
            .with_context(|| format!("{name}: lockup must be a non-negative day count (got {})", self.lockup))?;
        ensure!(
            (1..=5).contains(&self.risk),
            "{name}: risk must be between 1 and 5 (got {})",
            self.risk
        );

        Ok(Protocol::new(&name, self.apy, self.fee, lockup, self.risk as u8))
    }
}
