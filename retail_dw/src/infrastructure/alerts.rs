//! # Alert sink
//!
//! Interface-only alert fan-out (spec §6: `{level, message, details}`).
//! The default sink logs through `tracing`; a `QualityAlert`'s
//! `AnomalySeverity::High` maps to an ERROR-level alert, `Medium` to
//! WARNING (spec §6 "anomalies with HIGH severity produce ERROR alerts"),
//! layered with the Python original's CRITICAL-below-70%/WARNING-below-90%
//! threshold rule (SPEC_FULL.md §C.2).

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "INFO",
            AlertLevel::Warning => "WARNING",
            AlertLevel::Error => "ERROR",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, alert: Alert);
}

pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send(&self, alert: Alert) {
        match alert.level {
            AlertLevel::Critical | AlertLevel::Error => error!(level = alert.level.as_str(), details = ?alert.details, "{}", alert.message),
            AlertLevel::Warning => warn!(level = alert.level.as_str(), details = ?alert.details, "{}", alert.message),
            AlertLevel::Info => tracing::info!(level = alert.level.as_str(), details = ?alert.details, "{}", alert.message),
        }
    }
}

/// The Python original's threshold rule layered on top of the anomaly
/// severities spec §9 already defines for quality alerts: below 70% is
/// CRITICAL, below 90% is WARNING, otherwise no alert.
pub fn level_for_score(score: f64) -> Option<AlertLevel> {
    if score < 70.0 {
        Some(AlertLevel::Critical)
    } else if score < 90.0 {
        Some(AlertLevel::Warning)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_70_is_critical() {
        assert_eq!(level_for_score(69.9), Some(AlertLevel::Critical));
    }

    #[test]
    fn below_90_is_warning() {
        assert_eq!(level_for_score(89.9), Some(AlertLevel::Warning));
    }

    #[test]
    fn at_or_above_90_is_none() {
        assert_eq!(level_for_score(90.0), None);
    }
}
