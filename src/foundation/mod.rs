//! Shared primitives: geometry, numeric coercion and the error type.

/// Geometry vocabulary re-exported from `kurbo`.
pub mod core;
/// Error type and result alias.
pub mod error;
/// Rounded-rectangle paths and backend conversions.
pub mod geometry;
/// Tolerant number coercion.
pub mod num;
