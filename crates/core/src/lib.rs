pub mod catalog;
pub mod domain;
pub mod error;
pub mod recommender;
pub mod session;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_WALLET_CONNECT_DELAY_MS: u64 = 1000;
    pub const DEFAULT_MOCK_WALLET_ADDRESS: &str = "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub catalog_path: Option<String>,
        pub port: u16,
        pub wallet_connect_delay_ms: u64,
        pub mock_wallet_address: String,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = parse_or_default(
                "PORT",
                std::env::var("PORT").ok().as_deref(),
                DEFAULT_PORT,
            )?;
            let wallet_connect_delay_ms = parse_or_default(
                "WALLET_CONNECT_DELAY_MS",
                std::env::var("WALLET_CONNECT_DELAY_MS").ok().as_deref(),
                DEFAULT_WALLET_CONNECT_DELAY_MS,
            )?;

            let mock_wallet_address = std::env::var("MOCK_WALLET_ADDRESS")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_MOCK_WALLET_ADDRESS.to_string());

            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                catalog_path: std::env::var("CATALOG_PATH").ok(),
                port,
                wallet_connect_delay_ms,
                mock_wallet_address,
            })
        }

        pub fn wallet_connect_delay(&self) -> Duration {
            Duration::from_millis(self.wallet_connect_delay_ms)
        }

        /// Built-in seed unless `CATALOG_PATH` points at a JSON seed file.
        pub fn load_catalog(&self) -> anyhow::Result<crate::catalog::Catalog> {
            match self.catalog_path.as_deref() {
                Some(path) => crate::catalog::Catalog::from_seed_file(path),
                None => Ok(crate::catalog::Catalog::builtin()),
            }
        }
    }

    /// Unset means `default`; a set but unparsable value is an error.
    fn parse_or_default<T>(name: &str, value: Option<&str>, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match value {
            Some(s) => s
                .trim()
                .parse::<T>()
                .with_context(|| format!("{name} must be a number (got {s:?})")),
            None => Ok(default),
        }
    }

}
