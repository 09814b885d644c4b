//! Asset access, decoding, placeholders and resolution.

/// CSS-ish colour parsing.
pub mod color;
/// Raster/SVG decode, probing and PNG encode.
pub mod decode;
/// Generated placeholder images.
pub mod placeholder;
/// Source checks, placeholder substitution and size backfill.
pub mod resolver;
/// File and URL access.
pub mod store;
