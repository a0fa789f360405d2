use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Landing,
    SelectAssets,
    Results,
    NotFound,
}

impl Page {
    /// Only the three routes match; a single trailing slash is tolerated.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim();
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        match path {
            "/" => Page::Landing,
            "/select-assets" => Page::SelectAssets,
            "/results" => Page::Results,
            _ => Page::NotFound,
        }
    }

    /// Route of the page; `NotFound` has none of its own.
    pub fn route(self) -> Option<&'static str> {
        match self {
            Page::Landing => Some("/"),
            Page::SelectAssets => Some("/select-assets"),
            Page::Results => Some("/results"),
            Page::NotFound => None,
        }
    }
}

/// Page actually shown for `requested`, after the wallet and selection guards.
pub fn resolve(requested: Page, wallet_connected: bool, has_selection: bool) -> Page {
    match requested {
        Page::SelectAssets | Page::Results if !wallet_connected => Page::Landing,
        Page::Results if !has_selection => Page::SelectAssets,
        other => other,
    }
}
