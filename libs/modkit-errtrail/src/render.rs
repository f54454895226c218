//! Human-readable rendering of chains and collectors

use crate::collector::ErrorCollector;
use crate::config::RenderConfig;
use crate::node::{ChainLink, ErrorNode};

/// Turns chains into text according to a [`RenderConfig`].
#[derive(Debug, Clone, Default)]
pub struct TraceRenderer {
    config: RenderConfig,
}

impl TraceRenderer {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// One line per link, head first.
    ///
    /// Structured nodes render as `Message: <msg>, Path: <location>`, without
    /// the path when the location was cleared; an opaque terminal renders as
    /// `Cause: <error>`.
    #[must_use]
    pub fn lines(&self, err: &ErrorNode) -> Vec<String> {
        err.chain()
            .map(|link| match link {
                ChainLink::Node(node) => self.node_line(node),
                ChainLink::Opaque(cause) => format!("Cause: {cause}"),
            })
            .collect()
    }

    fn node_line(&self, node: &ErrorNode) -> String {
        let mut line = format!("Message: {}", node.text());
        if let Some(location) = node.location() {
            line.push_str(", Path: ");
            line.push_str(&location.render(self.config.location_style));
        }
        if self.config.include_baggage && !node.baggage().is_empty() {
            line.push_str(", Baggage: ");
            line.push_str(&node.baggage().to_string());
        }
        line
    }

    /// Same shape as [`ErrorNode::composed_message`], honoring the location style.
    #[must_use]
    pub fn message(&self, err: &ErrorNode) -> String {
        match err.location() {
            Some(location) => format!(
                "{}, {}",
                location.render(self.config.location_style),
                err.text()
            ),
            None => err.text().to_owned(),
        }
    }

    #[must_use]
    pub fn summary(&self, collector: &ErrorCollector) -> String {
        let messages: Vec<String> = collector.iter().map(|err| self.message(err)).collect();
        format!(
            "there are {} errors in collector, errors: [{}]",
            collector.len(),
            messages.join(", ")
        )
    }
}
