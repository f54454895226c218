//! Serializable snapshots of an error chain

use serde::{Deserialize, Serialize};

use crate::baggage::Baggage;
use crate::classification::Classification;
use crate::layer::DataLayer;
use crate::node::ErrorNode;
use crate::severity::Severity;

/// One entry of a reconstructed trace.
///
/// Records of structured nodes carry every attribute; the record of an
/// opaque terminal carries only its message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Composed message (`location, message`) for structured nodes, raw text
    /// for the opaque terminal.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baggage: Option<Baggage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_layer: Option<DataLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl TraceRecord {
    #[must_use]
    pub fn from_node(node: &ErrorNode) -> Self {
        Self {
            message: node.composed_message(),
            baggage: Some(node.baggage().clone()),
            classification: Some(node.classification()),
            data_layer: Some(node.data_layer()),
            severity: Some(node.severity()),
        }
    }

    #[must_use]
    pub fn opaque(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            baggage: None,
            classification: None,
            data_layer: None,
            severity: None,
        }
    }

    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.classification.is_none()
    }
}

/// Trace of a whole chain together with the head's baggage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceReport {
    pub stack: Vec<TraceRecord>,
    #[serde(default, skip_serializing_if = "Baggage::is_empty")]
    pub baggage: Baggage,
}
