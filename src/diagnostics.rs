//! Structured, recoverable warnings returned alongside pipeline results.

use serde::Serialize;

/// Pipeline stage that raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Asset resolution and size probing.
    Assets,
    /// Font registration.
    Fonts,
    /// Frame resolution and rasterization.
    Render,
}

/// One recoverable problem. The affected element was degraded or dropped, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Stage that raised it.
    pub stage: Stage,
    /// Index of the element in the input list, when tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
    /// Display name of the element, when tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Human-readable message.
    pub message: String,
}

/// Ordered collection of diagnostics.
///
/// Every entry is also emitted as a `tracing` warning so binaries get console output without the
/// library writing to stdout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning tied to an element.
    pub fn warn_element(
        &mut self,
        stage: Stage,
        index: usize,
        name: impl Into<String>,
        message: impl Into<String>,
    ) {
        let name = name.into();
        let message = message.into();
        tracing::warn!(?stage, index, element = %name, "{message}");
        self.entries.push(Diagnostic {
            stage,
            element_index: Some(index),
            element: Some(name),
            message,
        });
    }

    /// Record a warning not tied to an element.
    pub fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?stage, "{message}");
        self.entries.push(Diagnostic {
            stage,
            element_index: None,
            element: None,
            message,
        });
    }

    /// Append every entry of `other`, keeping order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Recorded entries in order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/unit/diagnostics.rs"]
mod tests;
