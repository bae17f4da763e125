//! Topology service configuration.
//!
//! Values come from environment variables first. If `SWITCHYARD_CONFIG` names
//! a YAML file, any field present there overrides the environment.
use crate::store::StoreConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_CHANGES_LIMIT: u64 = 1000;
pub const DEFAULT_CHANGE_RETENTION_MAX_ROWS: i64 = 10_000;

#[derive(Debug, Clone)]
pub struct TopologyConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    /// Page size for change-feed polls.
    pub changes_limit: u64,
    /// How many change-log entries the catalog retains.
    pub change_retention_max_rows: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TopologyConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    changes_limit: Option<u64>,
    change_retention_max_rows: Option<i64>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl TopologyConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_or("SWITCHYARD_BIND", "0.0.0.0:8443")
            .parse()
            .with_context(|| "parse SWITCHYARD_BIND")?;
        let metrics_bind = env_or("SWITCHYARD_METRICS_BIND", "0.0.0.0:8080")
            .parse()
            .with_context(|| "parse SWITCHYARD_METRICS_BIND")?;
        let changes_limit = env_or("SWITCHYARD_CHANGES_LIMIT", &DEFAULT_CHANGES_LIMIT.to_string())
            .parse()
            .with_context(|| "parse SWITCHYARD_CHANGES_LIMIT")?;
        let change_retention_max_rows = match std::env::var("SWITCHYARD_CHANGE_RETENTION_MAX_ROWS")
        {
            Ok(value) => Some(
                value
                    .parse()
                    .with_context(|| "parse SWITCHYARD_CHANGE_RETENTION_MAX_ROWS")?,
            ),
            Err(_) => Some(DEFAULT_CHANGE_RETENTION_MAX_ROWS),
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            changes_limit,
            change_retention_max_rows,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("SWITCHYARD_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read SWITCHYARD_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            changes_limit: self.changes_limit,
            change_retention_max_rows: self.change_retention_max_rows,
        }
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: TopologyConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse topology config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.changes_limit {
            self.changes_limit = value;
        }
        if let Some(value) = override_cfg.change_retention_max_rows {
            self.change_retention_max_rows = Some(value);
        }
        Ok(())
    }
}
