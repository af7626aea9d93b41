//! Auth service settings

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Settings read from `SHOWREEL_AUTH_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Listen address (default: "0.0.0.0:3000")
    pub bind_addr: String,
    /// Password for the first admin account, used only while `admin_users` is empty
    pub bootstrap_password: Option<String>,
}

impl AuthSettings {
    /// Load settings from the environment
    ///
    /// # Environment Variables
    /// - `SHOWREEL_AUTH_BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `SHOWREEL_AUTH_BOOTSTRAP_PASSWORD`: initial admin password (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:3000")?
            .add_source(Environment::with_prefix("SHOWREEL_AUTH"))
            .build()?
            .try_deserialize()
    }
}
