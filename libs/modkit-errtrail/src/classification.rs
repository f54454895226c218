//! Domain-level failure kinds and classification-scoped constructors

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::baggage::Baggage;
use crate::layer::DataLayer;
use crate::node::{ErrorNode, Link};
use crate::severity::Severity;

/// Enumerated failure kind carried by every [`ErrorNode`].
///
/// `Unknown` is the baseline: plain constructors and wrappers start from it,
/// and it is never inherited from a wrapped node.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    #[default]
    Unknown,
    BadRequest,
    Unauthorized,
    AccessDenied,
    NotFound,
    InvalidArguments,
    InternalError,
}

impl Classification {
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::BadRequest,
        Self::Unauthorized,
        Self::AccessDenied,
        Self::NotFound,
        Self::InvalidArguments,
        Self::InternalError,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::AccessDenied => "access_denied",
            Self::NotFound => "not_found",
            Self::InvalidArguments => "invalid_arguments",
            Self::InternalError => "internal_error",
        }
    }

    /// HTTP status conventionally associated with this kind.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidArguments => StatusCode::PRECONDITION_FAILED,
            Self::Unknown | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Numeric code of this kind (the HTTP status as `u16`).
    #[must_use]
    pub fn code(self) -> u16 {
        self.status().as_u16()
    }

    /// Same as [`ErrorNode::new`] with the classification bound to `self`.
    #[track_caller]
    #[must_use]
    pub fn new_error(
        self,
        data_layer: DataLayer,
        severity: Severity,
        baggage: Option<Baggage>,
        message: impl Into<String>,
    ) -> ErrorNode {
        ErrorNode::new(self, data_layer, severity, baggage, message)
    }

    /// Same as [`ErrorNode::new_fmt`] with the classification bound to `self`.
    #[track_caller]
    #[must_use]
    pub fn new_error_fmt(
        self,
        data_layer: DataLayer,
        severity: Severity,
        baggage: Option<Baggage>,
        args: fmt::Arguments<'_>,
    ) -> ErrorNode {
        ErrorNode::new_fmt(self, data_layer, severity, baggage, args)
    }

    /// Node with baseline layer and severity, classified as `self`.
    #[track_caller]
    #[must_use]
    pub fn base_error(self, message: impl Into<String>) -> ErrorNode {
        let mut node = ErrorNode::base(message);
        node.set_classification(self);
        node
    }

    #[track_caller]
    #[must_use]
    pub fn base_error_fmt(self, args: fmt::Arguments<'_>) -> ErrorNode {
        let mut node = ErrorNode::base_fmt(args);
        node.set_classification(self);
        node
    }

    /// Wraps `cause` like [`ErrorNode::wrap`], classifying the new head as `self`.
    #[track_caller]
    #[must_use]
    pub fn wrap(self, cause: impl Into<Link>, message: impl Into<String>) -> ErrorNode {
        let mut node = ErrorNode::wrap(cause, message);
        node.set_classification(self);
        node
    }

    #[track_caller]
    #[must_use]
    pub fn wrap_fmt(self, cause: impl Into<Link>, args: fmt::Arguments<'_>) -> ErrorNode {
        let mut node = ErrorNode::wrap_fmt(cause, args);
        node.set_classification(self);
        node
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
