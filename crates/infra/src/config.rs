//! Configuration loading and representation.
//!
//! Values come from environment variables; anything missing or unparsable falls
//! back to its default with a warning.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_SEED_COUNT: &str = "INVOICEDESK_SEED_COUNT";
pub const ENV_PAGE_SIZE: &str = "INVOICEDESK_PAGE_SIZE";
pub const ENV_LATENCY_MS: &str = "INVOICEDESK_LATENCY_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeskConfig {
    /// Number of sample invoices the repository starts with.
    pub seed_count: usize,
    /// Rows per page of the initial list request.
    pub page_size: u32,
    /// Simulated latency of the local data source.
    pub latency_ms: u64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            seed_count: 50,
            page_size: 5,
            latency_ms: 300,
        }
    }
}

impl DeskConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut page_size = parse_or(&lookup, ENV_PAGE_SIZE, defaults.page_size);
        if page_size == 0 {
            tracing::warn!(key = ENV_PAGE_SIZE, "page size must be at least 1; using default");
            page_size = defaults.page_size;
        }

        Self {
            seed_count: parse_or(&lookup, ENV_SEED_COUNT, defaults.seed_count),
            page_size,
            latency_ms: parse_or(&lookup, ENV_LATENCY_MS, defaults.latency_ms),
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "invalid configuration value; using default");
            default
        }),
    }
}
