use std::net::SocketAddr;

use anyhow::Context;
use clipshare_db::{IN_MEMORY, StoreConfig};

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    /// Public base URL used for absolute links on rendered pages.
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("CLIPSHARE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("CLIPSHARE_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("CLIPSHARE_PORT must be a port number")?;
        let address = lookup("CLIPSHARE_STORE_PATH").unwrap_or_else(|| IN_MEMORY.into());
        let base_url = lookup("CLIPSHARE_BASE_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            host,
            port,
            store: StoreConfig { address },
            base_url,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
