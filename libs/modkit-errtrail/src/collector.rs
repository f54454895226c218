//! Accumulation of independent error chains
//!
//! Used where several unrelated failures have to be reported together, for
//! example when validating a batch, instead of being chained causally.

use std::error::Error as StdError;
use std::fmt;

use crate::classification::Classification;
use crate::layer::DataLayer;
use crate::node::ErrorNode;

/// Ordered, append-only list of chain heads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorCollector {
    errs: Vec<ErrorNode>,
}

impl ErrorCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_err(&mut self, err: ErrorNode) {
        tracing::debug!(
            classification = %err.classification(),
            data_layer = %err.data_layer(),
            severity = %err.severity(),
            collected = self.errs.len() + 1,
            "error collected"
        );
        self.errs.push(err);
    }

    #[must_use]
    pub fn errs(&self) -> &[ErrorNode] {
        &self.errs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorNode> {
        self.errs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errs.is_empty()
    }

    /// True if some head has exactly this classification and layer.
    #[must_use]
    pub fn exists(&self, classification: Classification, data_layer: DataLayer) -> bool {
        self.exists_where(|err| {
            err.classification() == classification && err.data_layer() == data_layer
        })
    }

    /// Like [`exists`](Self::exists) but searches every node of every chain.
    #[must_use]
    pub fn exists_in_chains(&self, classification: Classification, data_layer: DataLayer) -> bool {
        self.exists_where(|err| err.exists_in_chain(classification, data_layer))
    }

    /// True if some head is classified like `target`.
    #[must_use]
    pub fn exists_like(&self, target: &ErrorNode) -> bool {
        self.exists_where(|err| err.is_classified_as(target))
    }

    #[must_use]
    pub fn exists_where<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&ErrorNode) -> bool,
    {
        self.errs.iter().any(predicate)
    }

    /// `Ok(())` when nothing was collected.
    ///
    /// # Errors
    /// Returns the collector itself if it holds at least one error.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    #[must_use]
    pub fn into_errs(self) -> Vec<ErrorNode> {
        self.errs
    }
}

impl fmt::Display for ErrorCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "there are {} errors in collector, errors: [", self.errs.len())?;
        for (idx, err) in self.errs.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&err.composed_message())?;
        }
        f.write_str("]")
    }
}

impl StdError for ErrorCollector {}

impl Extend<ErrorNode> for ErrorCollector {
    fn extend<I: IntoIterator<Item = ErrorNode>>(&mut self, iter: I) {
        for err in iter {
            self.add_err(err);
        }
    }
}

impl FromIterator<ErrorNode> for ErrorCollector {
    fn from_iter<I: IntoIterator<Item = ErrorNode>>(iter: I) -> Self {
        let mut collector = Self::new();
        collector.extend(iter);
        collector
    }
}

impl IntoIterator for ErrorCollector {
    type Item = ErrorNode;
    type IntoIter = std::vec::IntoIter<ErrorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.errs.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorCollector {
    type Item = &'a ErrorNode;
    type IntoIter = std::slice::Iter<'a, ErrorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.errs.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn add_err_logs_collected_error() {
        let mut collector = ErrorCollector::new();
        collector.add_err(Classification::NotFound.new_error(
            DataLayer::UseCase,
            Severity::Warning,
            None,
            "missing row",
        ));

        assert_eq!(collector.len(), 1);
        assert!(logs_contain("error collected"));
        assert!(logs_contain("classification=not_found"));
    }

    #[test]
    fn display_lists_top_level_messages() {
        let mut collector = ErrorCollector::new();
        let mut first = ErrorNode::base("first");
        first.set_location("a.rs:1");
        let mut second = ErrorNode::base("second");
        second.clear_location();
        collector.add_err(first);
        collector.add_err(second);

        assert_eq!(
            collector.to_string(),
            "there are 2 errors in collector, errors: [a.rs:1, first, second]"
        );
    }

    #[test]
    fn into_result_is_ok_only_when_empty() {
        assert!(ErrorCollector::new().into_result().is_ok());

        let collector: ErrorCollector = [ErrorNode::base("boom")].into_iter().collect();
        let err = collector.into_result().unwrap_err();
        assert_eq!(err.len(), 1);
    }
}
