//! Call-site identifiers attached to chain links

use std::fmt;
use std::panic::Location;

use crate::config::LocationStyle;

/// Where a node was created or annotated.
///
/// Captured locations come from `#[track_caller]`, so every public
/// constructor reports the line that called it rather than its own body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    Caller(&'static Location<'static>),
    /// Free-form path set explicitly by the caller.
    Custom(String),
}

impl ErrorLocation {
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Self::Caller(Location::caller())
    }

    #[must_use]
    pub fn file(&self) -> Option<&'static str> {
        match self {
            Self::Caller(location) => Some(location.file()),
            Self::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Caller(location) => Some(location.line()),
            Self::Custom(_) => None,
        }
    }

    /// Renders the location; custom paths are returned verbatim in every style.
    #[must_use]
    pub fn render(&self, style: LocationStyle) -> String {
        match (self, style) {
            (Self::Caller(location), LocationStyle::Compact) => {
                format!("{}:{}", location.file(), location.line())
            }
            (Self::Caller(location), LocationStyle::Verbose) => {
                format!("Called from {}, line #{}", location.file(), location.line())
            }
            (Self::Custom(path), _) => path.clone(),
        }
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(LocationStyle::Compact))
    }
}

impl From<&'static Location<'static>> for ErrorLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::Caller(location)
    }
}

impl From<String> for ErrorLocation {
    fn from(path: String) -> Self {
        Self::Custom(path)
    }
}

impl From<&str> for ErrorLocation {
    fn from(path: &str) -> Self {
        Self::Custom(path.to_owned())
    }
}
