//! Lookup key of a catalog message.

use std::fmt;

/// `(context, source text, disambiguation)` triple identifying one message.
///
/// An empty disambiguation is the same as none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    pub disambiguation: Option<String>,
}

impl MessageKey {
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self { context: context.into(), source: source.into(), disambiguation: None }
    }

    #[must_use]
    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.disambiguation = Some(disambiguation.into()).filter(|d| !d.is_empty());
        self
    }

    #[must_use]
    pub fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref()
    }

    /// Whether this key matches the borrowed lookup triple.
    #[must_use]
    pub fn matches(&self, context: &str, source: &str, disambiguation: Option<&str>) -> bool {
        self.context == context
            && self.source == source
            && self.disambiguation() == disambiguation.filter(|d| !d.is_empty())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source)?;
        if let Some(disambiguation) = &self.disambiguation {
            write!(f, " ({disambiguation})")?;
        }
        Ok(())
    }
}
