use super::*;
use crate::catalog::{CatalogEntry, FALLBACK_SUGGESTION};
use crate::domain::asset::{AssetId, AssetInfo};
use std::collections::BTreeMap;

fn select(ids: &[&str]) -> Selection {
    ids.iter().copied().map(AssetId::new).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn single_asset_catalog(protocols: Vec<Protocol>) -> Catalog {
    Catalog::new(
        vec![CatalogEntry {
            info: AssetInfo {
                id: AssetId::new("TST"),
                name: "Test".to_string(),
                description: String::new(),
            },
            protocols,
        }],
        BTreeMap::new(),
        FALLBACK_SUGGESTION.to_string(),
    )
}

#[test]
fn dot_scores_match_worked_example() {
    let catalog = Catalog::builtin();
    let dot = catalog.protocols(&AssetId::new("DOT")).unwrap();
    let scores: Vec<f64> = dot.iter().map(score).collect();
    assert_close(scores[0], 167.5);
    assert_close(scores[1], 119.05);
    assert_close(scores[2], 178.0);
    assert_close(scores[3], 138.2);
}

#[test]
fn dot_winner_is_parallel_finance() {
    let catalog = Catalog::builtin();
    let picks = best_protocols(&catalog, &select(&["DOT"])).unwrap();
    assert_eq!(picks.len(), 1);
    let best = picks[0].best.as_ref().unwrap();
    assert_eq!(best.name, "Parallel Finance");
    assert_close(best.score.unwrap(), 178.0);
}

#[test]
fn builtin_winners() {
    let catalog = Catalog::builtin();
    let rec = recommend(&catalog, &select(&["KSM", "USDC", "DOT"])).unwrap();
    let usdc = rec.best_for(&AssetId::new("USDC")).unwrap();
    assert_eq!(usdc.name, "Moonbeam USDC");
    assert_close(usdc.score.unwrap(), 103.95);
    let ksm = rec.best_for(&AssetId::new("KSM")).unwrap();
    assert_eq!(ksm.name, "Karura Yield");
    assert_close(ksm.score.unwrap(), 200.0);
}

#[test]
fn single_asset_pick_has_the_maximum_score() {
    let catalog = Catalog::builtin();
    for info in catalog.assets() {
        let selection: Selection = std::iter::once(info.id.clone()).collect();
        let picks = best_protocols(&catalog, &selection).unwrap();
        assert_eq!(picks.len(), 1);
        let best = picks[0].best.as_ref().unwrap();
        let max = catalog
            .protocols(&info.id)
            .unwrap()
            .iter()
            .map(score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(best.score, Some(max));
    }
}

#[test]
fn picks_follow_catalog_order() {
    let catalog = Catalog::builtin();
    let picks = best_protocols(&catalog, &select(&["KSM", "DOT"])).unwrap();
    let assets: Vec<&str> = picks.iter().map(|p| p.asset.as_str()).collect();
    assert_eq!(assets, vec!["DOT", "KSM"]);
}

#[test]
fn repeated_runs_are_identical() {
    let catalog = Catalog::builtin();
    let selection = select(&["DOT", "USDC", "KSM"]);
    let a = recommend(&catalog, &selection).unwrap();
    let b = recommend(&catalog, &selection).unwrap();
    assert_eq!(a, b);
    for (x, y) in a.picks.iter().zip(&b.picks) {
        let sx = x.best.as_ref().unwrap().score.unwrap();
        let sy = y.best.as_ref().unwrap().score.unwrap();
        assert_eq!(sx.to_bits(), sy.to_bits());
    }
}

#[test]
fn ties_keep_catalog_order() {
    let catalog = single_asset_catalog(vec![
        Protocol::new("Low", 1.0, 0.1, 0, 1),
        Protocol::new("First", 10.0, 0.1, 0, 1),
        Protocol::new("Second", 10.0, 0.1, 0, 1),
    ]);
    let best = best_protocols(&catalog, &select(&["TST"])).unwrap()[0]
        .best
        .clone()
        .unwrap();
    assert_eq!(best.name, "First");
}

#[test]
fn empty_candidate_list_yields_absent_pick() {
    let catalog = single_asset_catalog(Vec::new());
    let picks = best_protocols(&catalog, &select(&["TST"])).unwrap();
    assert_eq!(picks.len(), 1);
    assert!(picks[0].best.is_none());
}

#[test]
fn long_lockup_is_not_clamped() {
    let p = Protocol::new("Locked", 0.0, 0.0, 90, 5);
    // 0 + 5 + (30 - 90) / 10 + 8
    assert_close(score(&p), 7.0);
}

#[test]
fn unknown_asset_fails() {
    let catalog = Catalog::builtin();
    let err = recommend(&catalog, &select(&["DOT", "ETH"])).unwrap_err();
    assert_eq!(err.asset, AssetId::new("ETH"));
}

#[test]
fn empty_selection_gives_empty_recommendation() {
    let catalog = Catalog::builtin();
    let rec = recommend(&catalog, &Selection::new()).unwrap();
    assert!(rec.is_empty());
    assert_eq!(rec.suggestion, FALLBACK_SUGGESTION);
}

#[test]
fn suggestion_ignores_toggle_order() {
    let catalog = Catalog::builtin();
    assert_eq!(
        suggestion(&catalog, &select(&["DOT", "USDC"])),
        suggestion(&catalog, &select(&["USDC", "DOT"]))
    );
}

#[test]
fn full_selection_uses_three_asset_suggestion() {
    let catalog = Catalog::builtin();
    let expected = catalog.suggestion_for_key("DOT,USDC,KSM").unwrap();
    for order in [["DOT", "USDC", "KSM"], ["KSM", "USDC", "DOT"], ["USDC", "KSM", "DOT"]] {
        let mut selection = Selection::new();
        for id in order {
            selection.toggle(AssetId::new(id));
        }
        assert_eq!(suggestion(&catalog, &selection), expected);
    }
}

#[test]
fn unmatched_key_falls_back() {
    let catalog = Catalog::builtin();
    let text = suggestion(&catalog, &select(&["ETH"]));
    assert_eq!(text, FALLBACK_SUGGESTION);
    assert!(!text.is_empty());

    let bare = single_asset_catalog(vec![Protocol::new("Only", 1.0, 0.0, 0, 1)]);
    let rec = recommend(&bare, &select(&["TST"])).unwrap();
    assert_eq!(rec.suggestion, FALLBACK_SUGGESTION);
}
