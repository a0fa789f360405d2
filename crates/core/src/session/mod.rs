pub mod flow;

use crate::catalog::Catalog;
use crate::domain::asset::AssetId;
use crate::domain::recommendation::Recommendation;
use crate::domain::selection::Selection;
use anyhow::ensure;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WalletState {
    #[default]
    Disconnected,
    Connecting,
    Connected { address: String },
}

impl WalletState {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletState::Connected { .. })
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            WalletState::Connected { address } => Some(address),
            _ => None,
        }
    }
}

/// `15oF4u...6Sp5` style display form: first 6 and last 4 characters.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Caller-side state of the demo flow: simulated wallet, selection and the last result.
#[derive(Debug, Clone, Default)]
pub struct Session {
    wallet: WalletState,
    /// Bumped on every connect, disconnect and failure; a timer only completes its own attempt.
    connect_attempt: u64,
    selection: Selection,
    recommendation: Option<Recommendation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallet(&self) -> &WalletState {
        &self.wallet
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    /// Returns the attempt id the caller's connection timer must hand back to
    /// [`Session::complete_connect`]. `None` while a connection is pending or established.
    pub fn begin_connect(&mut self) -> Option<u64> {
        match self.wallet {
            WalletState::Disconnected => {
                self.connect_attempt += 1;
                self.wallet = WalletState::Connecting;
                tracing::info!(attempt = self.connect_attempt, "wallet connection started");
                Some(self.connect_attempt)
            }
            WalletState::Connecting | WalletState::Connected { .. } => None,
        }
    }

    /// Finishes the pending connection `attempt`. Ignored when the wallet was disconnected
    /// meanwhile, even if a newer attempt is pending now.
    pub fn complete_connect(&mut self, attempt: u64, address: &str) -> bool {
        if self.wallet != WalletState::Connecting || attempt != self.connect_attempt {
            tracing::debug!(attempt, current = self.connect_attempt, "stale wallet connection completion ignored");
            return false;
        }
        self.wallet = WalletState::Connected {
            address: address.to_string(),
        };
        tracing::info!(address = %short_address(address), "wallet connected");
        true
    }

    /// Abandons a pending connection after a failure.
    pub fn fail_connect(&mut self, reason: &str) {
        if self.wallet == WalletState::Connecting {
            self.connect_attempt += 1;
            self.wallet = WalletState::Disconnected;
            tracing::warn!(reason, "wallet connection failed");
        }
    }

    pub fn disconnect(&mut self) {
        self.connect_attempt += 1;
        self.wallet = WalletState::Disconnected;
        tracing::info!("wallet disconnected");
    }

    /// Returns whether the asset is selected afterwards.
    pub fn toggle_asset(&mut self, catalog: &Catalog, asset: AssetId) -> anyhow::Result<bool> {
        if !catalog.contains(&asset) {
            return Err(crate::error::UnknownAssetError { asset }.into());
        }
        Ok(self.selection.toggle(asset))
    }

    pub fn can_optimize(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Recomputes the recommendation for the current selection, replacing any previous one.
    pub fn optimize(&mut self, catalog: &Catalog) -> anyhow::Result<&Recommendation> {
        ensure!(self.can_optimize(), "select at least one asset before optimizing");
        let rec = crate::recommender::recommend(catalog, &self.selection)?;
        Ok(&*self.recommendation.insert(rec))
    }

    /// Clears the selection and drops the last recommendation.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.recommendation = None;
    }
}
