//! Layout model, element kinds and JSON I/O.

/// Type-name to renderer mapping.
pub mod kind;
/// Layout file reading and writing.
pub mod load;
/// Tolerant element model.
pub mod model;
