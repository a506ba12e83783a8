//! Engine configuration

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scorer::ScoringWeights;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown emit policy `{0}` (expected new_only or retain_seen)")]
    UnknownEmitPolicy(String),
}

/// Which matches a cycle publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitPolicy {
    /// Only matches created in this cycle
    #[default]
    NewOnly,
    /// New matches plus the earlier match of every seen pair still on offer
    RetainSeen,
}

impl FromStr for EmitPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new_only" => Ok(EmitPolicy::NewOnly),
            "retain_seen" => Ok(EmitPolicy::RetainSeen),
            other => Err(ConfigError::UnknownEmitPolicy(other.to_string())),
        }
    }
}

/// Match engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pause between the end of one cycle and the start of the next
    pub sync_interval: Duration,
    /// Upper bound for every remote call
    pub call_timeout: Duration,
    /// Tag sent with deliveries so suppliers can tell engine traffic apart
    pub caller_id: String,
    pub emit_policy: EmitPolicy,
    /// When false, matches are published without any remote side effects
    pub fulfillment_enabled: bool,
    pub weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(60),
            call_timeout: Duration::from_secs(5),
            caller_id: "match-engine".to_string(),
            emit_policy: EmitPolicy::NewOnly,
            fulfillment_enabled: true,
            weights: ScoringWeights::default(),
        }
    }
}
