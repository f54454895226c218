//! Error chain links and the algorithms that walk them
//!
//! A chain is a singly-linked list of [`ErrorNode`]s. Each node exclusively
//! owns its successor, which is either another node or an opaque failure that
//! terminates the chain. Wrapping always moves the previous head into a new
//! node, so chains stay linear and acyclic.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::baggage::Baggage;
use crate::classification::Classification;
use crate::layer::DataLayer;
use crate::location::ErrorLocation;
use crate::severity::Severity;
use crate::trace::{TraceRecord, TraceReport};

/// Unstructured failure that may terminate a chain.
pub type OpaqueError = dyn StdError + Send + Sync + 'static;

/// Owned successor of a node.
#[derive(Debug, Clone)]
pub enum Link {
    Node(Box<ErrorNode>),
    Opaque(Arc<OpaqueError>),
}

impl Link {
    /// Terminal link holding `err` as-is, without looking inside it.
    #[must_use]
    pub fn opaque<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Opaque(Arc::new(err))
    }

    /// Tags an arbitrary error: an [`ErrorNode`] becomes [`Link::Node`],
    /// anything else [`Link::Opaque`].
    #[must_use]
    pub fn from_error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(err))
    }

    #[must_use]
    pub fn from_boxed(err: Box<OpaqueError>) -> Self {
        match err.downcast::<ErrorNode>() {
            Ok(node) => Self::Node(node),
            Err(other) => Self::Opaque(Arc::from(other)),
        }
    }

    #[must_use]
    pub fn as_chain_link(&self) -> ChainLink<'_> {
        match self {
            Self::Node(node) => ChainLink::Node(&**node),
            Self::Opaque(err) => ChainLink::Opaque(&**err),
        }
    }
}

/// Structured nodes compare by value, opaque failures by identity.
impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Node(a), Self::Node(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            (Self::Node(_), Self::Opaque(_)) | (Self::Opaque(_), Self::Node(_)) => false,
        }
    }
}

impl From<ErrorNode> for Link {
    fn from(node: ErrorNode) -> Self {
        Self::Node(Box::new(node))
    }
}

impl From<Box<OpaqueError>> for Link {
    fn from(err: Box<OpaqueError>) -> Self {
        Self::from_boxed(err)
    }
}

/// A shared [`ErrorNode`] is copied out so it stays structured.
impl From<Arc<OpaqueError>> for Link {
    fn from(err: Arc<OpaqueError>) -> Self {
        match err.downcast_ref::<ErrorNode>().cloned() {
            Some(node) => Self::from(node),
            None => Self::Opaque(err),
        }
    }
}

impl From<&str> for Link {
    fn from(message: &str) -> Self {
        Self::Opaque(Arc::from(Box::<OpaqueError>::from(message)))
    }
}

impl From<String> for Link {
    fn from(message: String) -> Self {
        Self::Opaque(Arc::from(Box::<OpaqueError>::from(message)))
    }
}

/// Borrowed view of one element of a chain.
#[derive(Debug, Clone, Copy)]
pub enum ChainLink<'a> {
    Node(&'a ErrorNode),
    Opaque(&'a OpaqueError),
}

impl<'a> ChainLink<'a> {
    #[must_use]
    pub fn as_node(self) -> Option<&'a ErrorNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Opaque(_) => None,
        }
    }

    #[must_use]
    pub fn as_opaque(self) -> Option<&'a OpaqueError> {
        match self {
            Self::Node(_) => None,
            Self::Opaque(err) => Some(err),
        }
    }

    #[must_use]
    pub fn as_error(self) -> &'a (dyn StdError + 'static) {
        match self {
            Self::Node(node) => node,
            Self::Opaque(err) => err,
        }
    }
}

impl fmt::Display for ChainLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => fmt::Display::fmt(node, f),
            Self::Opaque(err) => fmt::Display::fmt(err, f),
        }
    }
}

/// Iterator over a chain, most recent link first.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<ChainLink<'a>>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = ChainLink<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if let ChainLink::Node(node) = current {
            self.next = node.successor();
        }
        Some(current)
    }
}

impl std::iter::FusedIterator for Chain<'_> {}

/// A single annotated link in an error chain.
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` walk the chain iteratively, so
/// arbitrarily long chains never exhaust the stack.
pub struct ErrorNode {
    classification: Classification,
    data_layer: DataLayer,
    severity: Severity,
    message: String,
    baggage: Baggage,
    location: Option<ErrorLocation>,
    next: Option<Link>,
}

impl ErrorNode {
    /// Root node without a successor. `None` baggage becomes an empty map.
    #[track_caller]
    #[must_use]
    pub fn new(
        classification: Classification,
        data_layer: DataLayer,
        severity: Severity,
        baggage: Option<Baggage>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            classification,
            data_layer,
            severity,
            message: message.into(),
            baggage: baggage.unwrap_or_default(),
            location: Some(ErrorLocation::caller()),
            next: None,
        }
    }

    #[track_caller]
    #[must_use]
    pub fn new_fmt(
        classification: Classification,
        data_layer: DataLayer,
        severity: Severity,
        baggage: Option<Baggage>,
        args: fmt::Arguments<'_>,
    ) -> Self {
        Self::new(classification, data_layer, severity, baggage, fmt::format(args))
    }

    /// Root node with every attribute at its baseline.
    #[track_caller]
    #[must_use]
    pub fn base(message: impl Into<String>) -> Self {
        Self::new(
            Classification::default(),
            DataLayer::default(),
            Severity::default(),
            None,
            message,
        )
    }

    #[track_caller]
    #[must_use]
    pub fn base_fmt(args: fmt::Arguments<'_>) -> Self {
        Self::base(fmt::format(args))
    }

    /// New head whose successor is `cause`.
    ///
    /// A structured cause donates its severity and data layer; the
    /// classification always starts at the baseline and the baggage empty.
    #[track_caller]
    #[must_use]
    pub fn wrap(cause: impl Into<Link>, message: impl Into<String>) -> Self {
        let location = ErrorLocation::caller();
        Self::wrap_at(cause.into(), message.into(), location)
    }

    #[track_caller]
    #[must_use]
    pub fn wrap_fmt(cause: impl Into<Link>, args: fmt::Arguments<'_>) -> Self {
        let location = ErrorLocation::caller();
        Self::wrap_at(cause.into(), fmt::format(args), location)
    }

    fn wrap_at(cause: Link, message: String, location: ErrorLocation) -> Self {
        let (data_layer, severity) = match &cause {
            Link::Node(node) => (node.data_layer, node.severity),
            Link::Opaque(_) => (DataLayer::default(), Severity::default()),
        };
        tracing::trace!(
            data_layer = %data_layer,
            severity = %severity,
            location = %location,
            "wrapping error"
        );
        Self {
            classification: Classification::default(),
            data_layer,
            severity,
            message,
            baggage: Baggage::new(),
            location: Some(location),
            next: Some(cause),
        }
    }

    /// Records another operation on top of this chain.
    ///
    /// The new head keeps this node's classification and data layer, takes
    /// `baggage` as-is (no merge with the current baggage) and is located at
    /// the caller of `add_operation`.
    #[track_caller]
    #[must_use]
    pub fn add_operation(
        self,
        message: impl Into<String>,
        baggage: Option<Baggage>,
        severity: Severity,
    ) -> Self {
        let location = ErrorLocation::caller();
        tracing::trace!(
            classification = %self.classification,
            data_layer = %self.data_layer,
            severity = %severity,
            location = %location,
            "adding operation to error chain"
        );
        Self {
            classification: self.classification,
            data_layer: self.data_layer,
            severity,
            message: message.into(),
            baggage: baggage.unwrap_or_default(),
            location: Some(location),
            next: Some(Link::from(self)),
        }
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    #[must_use]
    pub fn data_layer(&self) -> DataLayer {
        self.data_layer
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Raw message, without the location prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn baggage(&self) -> &Baggage {
        &self.baggage
    }

    #[must_use]
    pub fn location(&self) -> Option<&ErrorLocation> {
        self.location.as_ref()
    }

    pub fn set_classification(&mut self, classification: Classification) -> &mut Self {
        self.classification = classification;
        self
    }

    pub fn set_data_layer(&mut self, data_layer: DataLayer) -> &mut Self {
        self.data_layer = data_layer;
        self
    }

    pub fn set_severity(&mut self, severity: Severity) -> &mut Self {
        self.severity = severity;
        self
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = message.into();
        self
    }

    pub fn set_location(&mut self, location: impl Into<ErrorLocation>) -> &mut Self {
        self.location = Some(location.into());
        self
    }

    pub fn clear_location(&mut self) -> &mut Self {
        self.location = None;
        self
    }

    /// Replaces the baggage; `None` leaves an empty map.
    pub fn set_baggage(&mut self, baggage: Option<Baggage>) -> &mut Self {
        self.baggage = baggage.unwrap_or_default();
        self
    }

    /// Merges `delta` into the baggage, later keys overwriting earlier ones.
    pub fn add_baggage(&mut self, delta: Baggage) -> &mut Self {
        self.baggage.merge(delta);
        self
    }

    /// `"<location>, <message>"`, or the bare message when no location is set.
    ///
    /// An empty message falls back to the classification name so the result
    /// is never empty.
    #[must_use]
    pub fn composed_message(&self) -> String {
        match &self.location {
            Some(location) => format!("{location}, {}", self.text()),
            None => self.text().to_owned(),
        }
    }

    /// Raw message, or the classification name when it is empty.
    pub(crate) fn text(&self) -> &str {
        if self.message.is_empty() {
            self.classification.as_str()
        } else {
            &self.message
        }
    }

    /// Immediate successor; `None` means there is no further cause.
    #[must_use]
    pub fn successor(&self) -> Option<ChainLink<'_>> {
        self.next.as_ref().map(Link::as_chain_link)
    }

    #[must_use]
    pub fn into_successor(mut self) -> Option<Link> {
        self.next.take()
    }

    /// Walks the chain starting at this node.
    #[must_use]
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(ChainLink::Node(self)),
        }
    }

    /// Structured nodes of the chain, head first.
    pub fn nodes(&self) -> impl Iterator<Item = &ErrorNode> {
        self.chain().filter_map(ChainLink::as_node)
    }

    /// Innermost failure: the opaque terminal, or the last structured node
    /// when the chain ends without one.
    #[must_use]
    pub fn cause(&self) -> ChainLink<'_> {
        self.chain().last().unwrap_or(ChainLink::Node(self))
    }

    /// One record per link, most recent first.
    #[must_use]
    pub fn full_trace(&self) -> Vec<TraceRecord> {
        self.chain()
            .map(|link| match link {
                ChainLink::Node(node) => TraceRecord::from_node(node),
                ChainLink::Opaque(err) => TraceRecord::opaque(err.to_string()),
            })
            .collect()
    }

    /// Full trace plus this node's baggage.
    #[must_use]
    pub fn trace_report(&self) -> TraceReport {
        TraceReport {
            stack: self.full_trace(),
            baggage: self.baggage.clone(),
        }
    }

    /// Compares head classifications only; the rest of either chain is ignored.
    #[must_use]
    pub fn is_classified_as(&self, other: &ErrorNode) -> bool {
        self.classification == other.classification
    }

    /// True if a single node in the chain matches both fields.
    #[must_use]
    pub fn exists_in_chain(&self, classification: Classification, data_layer: DataLayer) -> bool {
        self.nodes()
            .any(|node| node.classification == classification && node.data_layer == data_layer)
    }

    #[must_use]
    pub fn exists_with_classification(&self, classification: Classification) -> bool {
        self.nodes().any(|node| node.classification == classification)
    }

    /// Structured nodes are matched on [`composed_message`](Self::composed_message),
    /// an opaque terminal on its own text.
    #[must_use]
    pub fn message_exists_in_chain(&self, message: &str) -> bool {
        self.chain().any(|link| match link {
            ChainLink::Node(node) => node.composed_message() == message,
            ChainLink::Opaque(err) => err.to_string() == message,
        })
    }
}

/// Raw messages of the whole chain joined by `": "`.
impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, link) in self.chain().enumerate() {
            if depth > 0 {
                f.write_str(": ")?;
            }
            match link {
                ChainLink::Node(node) => f.write_str(node.text())?,
                ChainLink::Opaque(err) => fmt::Display::fmt(err, f)?,
            }
        }
        Ok(())
    }
}

impl StdError for ErrorNode {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.successor().map(ChainLink::as_error)
    }
}

impl ErrorNode {
    fn detached_copy(&self, next: Option<Link>) -> Self {
        Self {
            classification: self.classification,
            data_layer: self.data_layer,
            severity: self.severity,
            message: self.message.clone(),
            baggage: self.baggage.clone(),
            location: self.location.clone(),
            next,
        }
    }

    fn same_fields(&self, other: &Self) -> bool {
        self.classification == other.classification
            && self.data_layer == other.data_layer
            && self.severity == other.severity
            && self.message == other.message
            && self.baggage == other.baggage
            && self.location == other.location
    }
}

impl Clone for ErrorNode {
    fn clone(&self) -> Self {
        let tail: Vec<&ErrorNode> = self.nodes().skip(1).collect();
        let last = tail.last().copied().unwrap_or(self);
        let mut next = match &last.next {
            Some(Link::Opaque(err)) => Some(Link::Opaque(Arc::clone(err))),
            Some(Link::Node(_)) | None => None,
        };
        for node in tail.into_iter().rev() {
            next = Some(Link::from(node.detached_copy(next.take())));
        }
        self.detached_copy(next)
    }
}

/// Structured nodes compare by value, opaque failures by identity.
impl PartialEq for ErrorNode {
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = self.chain();
        let mut rhs = other.chain();
        loop {
            let same = match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(ChainLink::Node(a)), Some(ChainLink::Node(b))) => a.same_fields(b),
                (Some(ChainLink::Opaque(a)), Some(ChainLink::Opaque(b))) => {
                    std::ptr::addr_eq(a, b)
                }
                _ => false,
            };
            if !same {
                return false;
            }
        }
    }
}

impl fmt::Debug for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorNode")
            .field("classification", &self.classification)
            .field("data_layer", &self.data_layer)
            .field("severity", &self.severity)
            .field("message", &self.message)
            .field("baggage", &self.baggage)
            .field("location", &self.location)
            .field("source", &self.successor().map(|link| format!("{link}")))
            .finish()
    }
}

impl Drop for ErrorNode {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(Link::Node(mut node)) = next {
            next = node.next.take();
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_baggage() -> Baggage {
        Baggage::new()
            .with("key1", "value1")
            .with("key2", json!(["value1_1", "value1_2"]))
    }

    fn reference_error() -> ErrorNode {
        let mut node = ErrorNode::new(
            Classification::NotFound,
            DataLayer::UseCase,
            Severity::Debug,
            Some(reference_baggage()),
            "Not Found",
        );
        node.set_location("Err Path");
        node
    }

    #[test]
    fn new_normalizes_missing_baggage() {
        let node = ErrorNode::new(
            Classification::NotFound,
            DataLayer::Controller,
            Severity::Debug,
            None,
            "missing",
        );
        assert_eq!(node.baggage(), &Baggage::new());
        assert!(node.successor().is_none());
    }

    #[test]
    fn setters_chain_and_apply() {
        let mut node = reference_error();
        node.set_classification(Classification::Unauthorized)
            .set_severity(Severity::Critical)
            .set_data_layer(DataLayer::Container)
            .set_message("Test");

        assert_eq!(node.classification(), Classification::Unauthorized);
        assert_eq!(node.severity(), Severity::Critical);
        assert_eq!(node.data_layer(), DataLayer::Container);
        assert_eq!(node.composed_message(), "Err Path, Test");
    }

    #[test]
    fn set_baggage_none_then_add_matches_fresh_node() {
        let mut node = reference_error();
        node.set_baggage(None);
        assert!(node.baggage().is_empty());

        let delta = Baggage::new().with("key1", "value2");
        node.add_baggage(delta.clone());

        let mut fresh = ErrorNode::base("fresh");
        fresh.add_baggage(delta);
        assert_eq!(node.baggage(), fresh.baggage());
    }

    #[test]
    fn add_baggage_overlays_later_keys() {
        let mut node = reference_error();
        node.set_baggage(None)
            .add_baggage(Baggage::new().with("key1", "value2").with("key3", json!([1, 2])))
            .add_baggage(Baggage::new().with("key2", "value3").with("key1", "value4"));

        let expected = Baggage::new()
            .with("key1", "value4")
            .with("key2", "value3")
            .with("key3", json!([1, 2]));
        assert_eq!(node.baggage(), &expected);
    }

    #[test]
    fn composed_message_without_location_is_raw() {
        let mut node = reference_error();
        node.clear_location();
        assert_eq!(node.composed_message(), "Not Found");

        node.set_message("");
        assert_eq!(node.composed_message(), "not_found");
        assert_eq!(node.to_string(), "not_found");
    }

    #[test]
    fn wrap_of_opaque_uses_baselines() {
        let node = ErrorNode::wrap("connection refused", "loading user");
        assert_eq!(node.classification(), Classification::Unknown);
        assert_eq!(node.data_layer(), DataLayer::Unknown);
        assert_eq!(node.severity(), Severity::Error);
        assert!(node.baggage().is_empty());
        assert_eq!(node.to_string(), "loading user: connection refused");
    }

    #[test]
    fn wrap_of_node_inherits_layer_and_severity_only() {
        let node = ErrorNode::wrap(reference_error(), "outer");
        assert_eq!(node.classification(), Classification::Unknown);
        assert_eq!(node.data_layer(), DataLayer::UseCase);
        assert_eq!(node.severity(), Severity::Debug);
        assert!(node.baggage().is_empty());
    }

    #[test]
    fn from_error_detects_nested_nodes() {
        let link = Link::from_error(reference_error());
        assert!(matches!(link, Link::Node(_)));

        let link = Link::from_error(std::io::Error::other("disk"));
        assert!(matches!(link, Link::Opaque(_)));
    }

    #[test]
    fn shared_nodes_stay_structured() {
        let shared: Arc<OpaqueError> = Arc::new(reference_error());
        let link = Link::from(shared);
        let node = link.as_chain_link().as_node().expect("structured link");
        assert_eq!(node.classification(), Classification::NotFound);
        assert!(node.exists_with_classification(Classification::NotFound));

        let shared: Arc<OpaqueError> = Arc::new(std::io::Error::other("disk"));
        match Link::from(Arc::clone(&shared)) {
            Link::Opaque(err) => assert!(Arc::ptr_eq(&err, &shared)),
            Link::Node(_) => panic!("plain errors stay opaque"),
        }
    }

    #[test]
    fn clone_keeps_opaque_identity() {
        let node = ErrorNode::wrap(ErrorNode::wrap("disk full", "inner"), "outer");
        let copy = node.clone();
        assert_eq!(copy, node);
        assert_eq!(copy.to_string(), "outer: inner: disk full");

        let mut other = node.clone();
        other.set_message("changed");
        assert_ne!(other, node);
        let (first, second) = (
            ErrorNode::wrap("disk full", "outer"),
            ErrorNode::wrap("disk full", "outer"),
        );
        assert_ne!(first, second);
    }

    #[test]
    fn debug_shows_source_text() {
        let node = ErrorNode::wrap("disk full", "saving");
        let rendered = format!("{node:?}");
        assert!(rendered.starts_with("ErrorNode {"));
        assert!(rendered.contains(r#"source: Some("disk full")"#));
    }

    #[test]
    fn chains_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ErrorNode>();
        assert_send_sync::<Link>();
    }

    #[test]
    fn source_follows_the_chain() {
        let node = ErrorNode::wrap(ErrorNode::wrap("root cause", "inner"), "outer");
        let mut sources = Vec::new();
        let mut current: Option<&(dyn StdError + 'static)> = node.source();
        while let Some(err) = current {
            sources.push(err.to_string());
            current = err.source();
        }
        assert_eq!(sources, vec!["inner: root cause", "root cause"]);
    }
}
