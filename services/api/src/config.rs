//! API service settings

use std::time::Duration;

use catalog::{ManagerConfig, showcase::ShowcaseLayout};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Settings read from `SHOWREEL_API_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Listen address (default: "0.0.0.0:3001")
    pub bind_addr: String,
    /// Entries per admin page (default: 6)
    pub admin_page_size: usize,
    /// Seconds a success notice stays visible (default: 3)
    pub notice_ttl_secs: u64,
    /// Public wide lane page size (default: 8)
    pub wide_page_size: usize,
    /// Public tall lane page size (default: 3)
    pub tall_page_size: usize,
    /// Seconds between sweeps of expired admin managers (default: 60)
    pub session_sweep_secs: u64,
}

impl ApiSettings {
    /// Load settings from the environment
    ///
    /// # Environment Variables
    /// - `SHOWREEL_API_BIND_ADDR`
    /// - `SHOWREEL_API_ADMIN_PAGE_SIZE`
    /// - `SHOWREEL_API_NOTICE_TTL_SECS`
    /// - `SHOWREEL_API_WIDE_PAGE_SIZE`
    /// - `SHOWREEL_API_TALL_PAGE_SIZE`
    /// - `SHOWREEL_API_SESSION_SWEEP_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:3001")?
            .set_default("admin_page_size", 6)?
            .set_default("notice_ttl_secs", 3)?
            .set_default("wide_page_size", 8)?
            .set_default("tall_page_size", 3)?
            .set_default("session_sweep_secs", 60)?
            .add_source(Environment::with_prefix("SHOWREEL_API"))
            .build()?
            .try_deserialize()
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            page_size: self.admin_page_size,
            success_ttl: Duration::from_secs(self.notice_ttl_secs),
        }
    }

    pub fn showcase_layout(&self) -> ShowcaseLayout {
        ShowcaseLayout {
            wide_page_size: self.wide_page_size,
            tall_page_size: self.tall_page_size,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }
}
