use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical layer at which a failure was recorded.
///
/// Used for filtering and matching only; nothing branches on it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataLayer {
    #[default]
    Unknown,
    Transport,
    Controller,
    UseCase,
    DataService,
    Container,
}

impl DataLayer {
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::Transport,
        Self::Controller,
        Self::UseCase,
        Self::DataService,
        Self::Container,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Transport => "transport",
            Self::Controller => "controller",
            Self::UseCase => "use_case",
            Self::DataService => "data_service",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for DataLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
