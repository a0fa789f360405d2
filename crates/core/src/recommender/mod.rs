//! Protocol scoring and per-asset best pick.
//!
//! Everything here is a pure function of the catalog and the selection; repeated calls with
//! the same inputs return identical results.

use crate::catalog::Catalog;
use crate::domain::protocol::Protocol;
use crate::domain::recommendation::{AssetPick, Recommendation};
use crate::domain::selection::Selection;
use crate::error::UnknownAssetError;

const APY_WEIGHT: f64 = 10.0;
const FEE_WEIGHT: f64 = 5.0;
const LOCKUP_PIVOT_DAYS: f64 = 30.0;
const LOCKUP_DIVISOR: f64 = 10.0;
const RISK_CEILING: f64 = 6.0;
const RISK_WEIGHT: f64 = 8.0;

/// Weighted sum of yield, fee, lockup and risk.
///
/// The lockup term is not clamped: lockups longer than 30 days subtract from the score.
pub fn score(protocol: &Protocol) -> f64 {
    let apy_term = protocol.apy * APY_WEIGHT;
    let fee_term = (1.0 - protocol.fee) * FEE_WEIGHT;
    let lockup_term = (LOCKUP_PIVOT_DAYS - f64::from(protocol.lockup)) / LOCKUP_DIVISOR;
    let risk_term = (RISK_CEILING - f64::from(protocol.risk)) * RISK_WEIGHT;
    apy_term + fee_term + lockup_term + risk_term
}

/// Copy of every protocol with its score filled in, catalog order preserved.
pub fn scored(protocols: &[Protocol]) -> Vec<Protocol> {
    protocols
        .iter()
        .map(|p| Protocol {
            score: Some(score(p)),
            ..p.clone()
        })
        .collect()
}

/// Highest score wins; on ties the earlier protocol keeps its place.
pub fn best_of(protocols: &[Protocol]) -> Option<Protocol> {
    let mut best: Option<Protocol> = None;
    for p in scored(protocols) {
        let better = match &best {
            None => true,
            Some(current) => p.score > current.score,
        };
        if better {
            best = Some(p);
        }
    }
    best
}

pub fn best_protocols(
    catalog: &Catalog,
    selection: &Selection,
) -> Result<Vec<AssetPick>, UnknownAssetError> {
    let mut picks = Vec::with_capacity(selection.len());
    for asset in catalog.canonical_order(selection) {
        let protocols = catalog.protocols(asset)?;
        let best = best_of(protocols);
        if best.is_none() {
            tracing::warn!(%asset, "asset has no candidate protocols");
        }
        picks.push(AssetPick {
            asset: asset.clone(),
            best,
        });
    }
    Ok(picks)
}

/// Canned text for the selection's canonical key, or the catalog's fallback.
pub fn suggestion<'c>(catalog: &'c Catalog, selection: &Selection) -> &'c str {
    let key = catalog.canonical_key(selection);
    catalog
        .suggestion_for_key(&key)
        .unwrap_or_else(|| catalog.fallback_suggestion())
}

pub fn recommend(
    catalog: &Catalog,
    selection: &Selection,
) -> Result<Recommendation, UnknownAssetError> {
    let picks = best_protocols(catalog, selection)?;
    let suggestion = suggestion(catalog, selection).to_string();
    tracing::debug!(
        assets = %catalog.canonical_key(selection),
        picks = picks.len(),
        "computed recommendation"
    );
    Ok(Recommendation { picks, suggestion })
}

#[cfg(test)]
mod tests;
