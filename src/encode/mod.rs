//! Document encoding sinks.
//!
//! Sinks consume finished documents, whose layers arrive top-most first.

/// Document sink trait and built-in sinks.
pub mod sink;
