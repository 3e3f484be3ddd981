//! Audit configuration (environment-driven).

use serde::{Deserialize, Serialize};

pub const PAGE_SIZE_ENV: &str = "TASKHUB_AUDIT_PAGE_SIZE";
pub const MAX_PAGE_SIZE_ENV: &str = "TASKHUB_AUDIT_MAX_PAGE_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 1000,
        }
    }
}

impl AuditConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; absent or invalid values keep the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str, fallback: u32| -> u32 {
            match lookup(key).map(|v| v.trim().parse::<u32>()) {
                Some(Ok(v)) if v > 0 => v,
                Some(_) => {
                    tracing::warn!(key, "ignoring invalid audit config value");
                    fallback
                }
                None => fallback,
            }
        };

        let max_page_size = read(MAX_PAGE_SIZE_ENV, defaults.max_page_size);
        let default_page_size = read(PAGE_SIZE_ENV, defaults.default_page_size).min(max_page_size);

        Self {
            default_page_size,
            max_page_size,
        }
    }
}
