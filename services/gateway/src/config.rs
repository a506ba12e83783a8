use anyhow::{Context, Result};
use dotenvy::dotenv;
use match_engine::{EmitPolicy, EngineConfig};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub needs_rpc_url: String,
    pub offers_rpc_url: String,
    pub supply_rpc_url: String,
    pub sync_interval: Duration,
    pub call_timeout: Duration,
    pub caller_id: String,
    pub emit_policy: EmitPolicy,
    pub fulfillment_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let offers_rpc_url = lookup("OFFERS_RPC_URL")
            .unwrap_or_else(|| "http://opportunity-agent:9003".to_string());

        Ok(Self {
            bind_addr: lookup("BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:9002".to_string())
                .parse()
                .context("BIND_ADDR must be a socket address")?,
            needs_rpc_url: lookup("NEEDS_RPC_URL")
                .unwrap_or_else(|| "http://needs-worker:9001".to_string()),
            supply_rpc_url: lookup("SUPPLY_RPC_URL").unwrap_or_else(|| offers_rpc_url.clone()),
            offers_rpc_url,
            sync_interval: Duration::from_secs(
                lookup("SYNC_INTERVAL_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse()
                    .context("SYNC_INTERVAL_SECS must be a whole number of seconds")?,
            ),
            call_timeout: Duration::from_secs(
                lookup("CALL_TIMEOUT_SECS")
                    .unwrap_or_else(|| "5".to_string())
                    .parse()
                    .context("CALL_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            caller_id: lookup("ENGINE_CALLER_ID").unwrap_or_else(|| "match-engine".to_string()),
            emit_policy: lookup("EMIT_POLICY")
                .unwrap_or_else(|| "new_only".to_string())
                .parse::<EmitPolicy>()
                .context("EMIT_POLICY is invalid")?,
            fulfillment_enabled: lookup("FULFILLMENT_ENABLED")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .context("FULFILLMENT_ENABLED must be true or false")?,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            sync_interval: self.sync_interval,
            call_timeout: self.call_timeout,
            caller_id: self.caller_id.clone(),
            emit_policy: self.emit_policy,
            fulfillment_enabled: self.fulfillment_enabled,
            ..EngineConfig::default()
        }
    }
}
