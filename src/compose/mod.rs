//! Canvas bounds, element frames and z-ordered compositing.

/// Canvas extent and origin offset.
pub mod bounds;
/// Stable z-sort, render and document assembly.
pub mod compositor;
/// Per-element pixel frames.
pub mod frame;
