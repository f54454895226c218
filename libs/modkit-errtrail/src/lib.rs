//! Structured error chains for the modkit framework
//!
//! An [`ErrorNode`] annotates a failure with a [`Classification`], a
//! [`DataLayer`], a [`Severity`], free-form [`Baggage`] and the location where
//! it was created. Nodes wrap each other into a linear chain that ends in an
//! opaque error (or nowhere), and the chain can be queried and turned into a
//! trace afterwards:
//!
//! ```
//! use modkit_errtrail::{Classification, DataLayer, ErrorNode, Severity};
//!
//! let err = Classification::NotFound
//!     .wrap("row not found", "loading user")
//!     .add_operation("handling GET /users/42", None, Severity::Warning);
//!
//! assert!(err.exists_with_classification(Classification::NotFound));
//! assert_eq!(err.full_trace().len(), 3);
//! assert_eq!(err.cause().to_string(), "row not found");
//! assert_eq!(err.data_layer(), DataLayer::Unknown);
//! ```
//!
//! Unrelated failures are gathered in an [`ErrorCollector`]; text output is
//! produced by a [`TraceRenderer`] configured through [`RenderConfig`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod baggage;
pub mod classification;
pub mod collector;
pub mod config;
pub mod layer;
pub mod location;
pub mod node;
pub mod render;
pub mod severity;
pub mod trace;

pub use baggage::Baggage;
pub use classification::Classification;
pub use collector::ErrorCollector;
pub use config::{ConfigError, LocationStyle, RenderConfig};
pub use layer::DataLayer;
pub use location::ErrorLocation;
pub use node::{Chain, ChainLink, ErrorNode, Link, OpaqueError};
pub use render::TraceRenderer;
pub use severity::Severity;
pub use trace::{TraceRecord, TraceReport};
