// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Painel", "painel"));

pub const ENV_DB: &str = "PAINEL_DB";
pub const ENV_POOL_SIZE: &str = "PAINEL_POOL_SIZE";
pub const ENV_BUSY_TIMEOUT_MS: &str = "PAINEL_BUSY_TIMEOUT_MS";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives and how connections to it are drawn.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub pool_size: u32,
    /// How long a caller waits for a pooled connection.
    pub connect_timeout: Duration,
    /// Passed to SQLite unchanged; `None` leaves the driver default.
    pub busy_timeout: Option<Duration>,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            busy_timeout: Some(DEFAULT_BUSY_TIMEOUT),
        }
    }

    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Explicit path, then `PAINEL_DB`, then the platform data directory.
    /// Pool size and busy timeout may be overridden from the environment.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p,
            None => match std::env::var_os(ENV_DB) {
                Some(p) => PathBuf::from(p),
                None => default_db_path()?,
            },
        };
        let mut cfg = Self::new(path);
        if let Ok(raw) = std::env::var(ENV_POOL_SIZE) {
            let n: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", ENV_POOL_SIZE, raw))?;
            cfg = cfg.with_pool_size(n);
        }
        if let Ok(raw) = std::env::var(ENV_BUSY_TIMEOUT_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", ENV_BUSY_TIMEOUT_MS, raw))?;
            cfg = cfg.with_busy_timeout(Some(Duration::from_millis(ms)));
        }
        Ok(cfg)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("painel.sqlite"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let cfg = StoreConfig::resolve(Some(PathBuf::from("/tmp/x.sqlite"))).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.sqlite"));
        assert!(cfg.pool_size >= 1);
    }

    #[test]
    fn pool_size_never_zero() {
        let cfg = StoreConfig::new("a.sqlite").with_pool_size(0);
        assert_eq!(cfg.pool_size, 1);
    }
}
