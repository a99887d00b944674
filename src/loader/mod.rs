//! Lazy visible record loading
//!
//! A row of a record list owns one [`RecordLoader`]: a visibility tracker, a
//! fetch coordinator and a cache slot. The row fetches only while it is on
//! screen, re-polls on the visibility recheck timer, drops results that arrive
//! for a superseded record id, and renders a placeholder until a fetch lands.

pub mod coordinator;
pub mod render;
pub mod schedule;
pub mod slot;
pub mod visibility;

pub use coordinator::{FetchCoordinator, RecordAccessor, RefreshOutcome};
pub use render::{
    humanize_short, render, unix_now, Countdown, RenderContext, RenderRecord, RowTicker, ViewModel,
    SPINNER_GLYPH,
};
pub use schedule::{RecordLoader, RowDriver, Trigger};
pub use slot::{FetchState, RecordCacheSlot, SlotWatch, Ticket};
pub use visibility::{IntersectionHandle, Viewport, VisibilityTracker};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::env::LoaderEnvConfig;
use crate::error::Error;

/// What a row shows after a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the failure message so the row can render an error view
    #[default]
    Preserve,
    /// Fall back to the empty state, indistinguishable from "never fetched"
    Collapse,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Preserve => write!(f, "preserve"),
            FailurePolicy::Collapse => write!(f, "collapse"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" => Ok(FailurePolicy::Preserve),
            "collapse" => Ok(FailurePolicy::Collapse),
            other => Err(Error::Config(format!(
                "Invalid failure policy: {}. Must be one of: preserve, collapse",
                other
            ))),
        }
    }
}

/// Timing and failure settings shared by every row of a list
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Timer trigger for re-deriving visibility (and re-polling visible rows)
    pub visibility_recheck: Duration,
    /// Period of the per-row countdown ticker
    pub tick: Duration,
    /// Delay before fetching after a record id change
    pub debounce: Duration,
    /// Upper bound on a single fetch
    pub fetch_timeout: Duration,
    pub failure_policy: FailurePolicy,
    /// Leave a Ready row on screen while the same record is re-polled,
    /// instead of dropping back to the spinner
    pub keep_while_refreshing: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            visibility_recheck: Duration::from_secs(2),
            tick: Duration::from_secs(1),
            debounce: Duration::from_millis(250),
            fetch_timeout: Duration::from_secs(15),
            failure_policy: FailurePolicy::Preserve,
            keep_while_refreshing: false,
        }
    }
}

impl LoaderConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_keep_while_refreshing(mut self, keep: bool) -> Self {
        self.keep_while_refreshing = keep;
        self
    }
}

impl From<&LoaderEnvConfig> for LoaderConfig {
    fn from(env: &LoaderEnvConfig) -> Self {
        let defaults = Self::default();
        Self {
            visibility_recheck: env
                .visibility_recheck_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.visibility_recheck),
            tick: env.tick_ms.map(Duration::from_millis).unwrap_or(defaults.tick),
            debounce: env
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            fetch_timeout: env
                .fetch_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            failure_policy: env.failure_policy.unwrap_or(defaults.failure_policy),
            keep_while_refreshing: env
                .keep_while_refreshing
                .unwrap_or(defaults.keep_while_refreshing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!(
            "Preserve".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Preserve
        );
        assert_eq!(
            "collapse".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Collapse
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_loader_config_from_env_section() {
        let env = LoaderEnvConfig {
            visibility_recheck_ms: Some(500),
            debounce_ms: Some(0),
            failure_policy: Some(FailurePolicy::Collapse),
            keep_while_refreshing: Some(true),
            ..Default::default()
        };
        let config = LoaderConfig::from(&env);
        assert_eq!(config.visibility_recheck, Duration::from_millis(500));
        assert!(config.debounce.is_zero());
        assert_eq!(config.fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.failure_policy, FailurePolicy::Collapse);
        assert!(config.keep_while_refreshing);
        assert!(!LoaderConfig::default().keep_while_refreshing);
    }
}
