mod env;
mod types;

#[cfg(test)]
mod tests;

pub use types::*;

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject values the service cannot start with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.retrieval.k == 0 {
            bail!("retrieval.k must be at least 1");
        }
        if self.embedding.devices.is_empty() {
            bail!("embedding.devices must list at least one device");
        }
        if self.embedding.model.trim().is_empty() {
            bail!("embedding.model must not be empty");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.index.path.trim().is_empty() {
            bail!("index.path must not be empty");
        }
        if self.server.max_body_size == 0 {
            bail!("server.max_body_size must be greater than zero");
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Listen address built from `bind` and `port`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind` is not an IPv4 or IPv6 address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .trim()
            .parse()
            .with_context(|| format!("server.bind '{}' is not an IP address", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
