//! Application configuration management.
//!
//! Configuration is merged from defaults, an optional file named on the
//! command line, and environment variables, in increasing precedence.

use crate::{Cli, schedule::Scheduler};
use serde::{Deserialize, Serialize};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Web server configuration (bind address, pagination limits)
    #[serde(default)]
    pub server: acp_axum::config::AxumConfig,

    /// Database configuration
    #[serde(default)]
    pub database: acp_sqlite::config::SqliteConfig,

    /// Auction lifecycle tunables
    #[serde(default)]
    pub auction: acp_core::config::AuctionConfig,

    /// Expiry sweep scheduling
    #[serde(default)]
    pub schedule: Scheduler,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `APP_<SECTION>__<KEY>` to `<section>.<key>`:
    ///
    /// ```bash
    /// export APP_DATABASE__DATABASE_PATH="/data/platform.db"
    /// export APP_SERVER__BIND_ADDRESS="0.0.0.0:3000"
    /// export APP_AUCTION__MAX_BID_ATTEMPTS=8
    /// export APP_SCHEDULE__EVERY="30s"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // APP_SERVER__BIND_ADDRESS becomes server.bind_address
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, time::Duration};

    fn cli(config: Option<PathBuf>) -> Cli {
        Cli {
            config,
            secret: "secret".into(),
            schema: None,
        }
    }

    #[test]
    fn test_file_overrides_defaults() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("acpdemo-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            page_limit = 25

            [auction]
            max_bid_attempts = 9
            ending_soon = "2h"

            [schedule]
            every = "30s"
            "#,
        )?;

        let loaded = AppConfig::load(&cli(Some(path.clone())));
        std::fs::remove_file(&path)?;
        let loaded = loaded?;

        assert_eq!(loaded.server.page_limit, 25);
        assert_eq!(loaded.auction.max_bid_attempts, 9);
        assert_eq!(loaded.auction.ending_soon, Duration::from_secs(7200));
        assert_eq!(loaded.auction.ending_soon_limit, 10);
        assert_eq!(loaded.schedule.every, Some(Duration::from_secs(30)));
        assert!(loaded.database.database_path.is_none());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/acpdemo.toml");
        assert!(AppConfig::load(&cli(Some(missing))).is_err());
    }
}
