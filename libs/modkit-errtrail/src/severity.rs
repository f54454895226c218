use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Urgency of a failure, independent of its classification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
    Critical,
    Fatal,
    Panic,
}

impl Severity {
    pub const ALL: [Self; 7] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::Fatal,
        Self::Panic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }

    /// Closest `tracing` level; everything from `Error` upwards collapses to `ERROR`.
    #[must_use]
    pub const fn tracing_level(self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical | Self::Fatal | Self::Panic => Level::ERROR,
        }
    }
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        severity.tracing_level()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered_by_urgency() {
        assert!(Severity::Debug < Severity::Warning);
        assert!(Severity::Critical < Severity::Panic);
        let mut sorted = Severity::ALL;
        sorted.sort();
        assert_eq!(sorted, Severity::ALL);
    }

    #[test]
    fn maps_to_tracing_levels() {
        assert_eq!(Level::from(Severity::Debug), Level::DEBUG);
        assert_eq!(Level::from(Severity::Warning), Level::WARN);
        assert_eq!(Level::from(Severity::Fatal), Level::ERROR);
        assert_eq!(Severity::default().tracing_level(), Level::ERROR);
    }
}
