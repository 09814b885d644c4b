//! layerforge turns JSON-described UI layouts into layered raster documents.
//!
//! A layout is a flat list of positioned elements (images, text, panels, controls). Composing
//! one runs three stages:
//!
//! - Resolve assets: image elements with no usable source get a generated placeholder, and
//!   missing sizes are backfilled from the resolved image.
//! - Compute bounds: the canvas extent plus margin.
//! - Composite: elements are z-sorted (stable), rendered into per-element layers and collected
//!   top-most first into a [`Document`].
//!
//! Recoverable problems never fail the call; they come back as [`Diagnostics`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Asset access, decoding, placeholders and resolution.
pub mod assets;
/// Bounds, frames and compositing.
pub mod compose;
/// Structured warnings.
pub mod diagnostics;
/// Layered document model.
pub mod document;
/// Document sinks.
pub mod encode;
/// Shared primitives.
pub mod foundation;
/// Layout model and JSON I/O.
pub mod layout;
/// Top-level entry points.
pub mod pipeline;
/// Per-element rasterization.
pub mod render;

pub use crate::assets::color::{ColorValue, Rgba8};
pub use crate::assets::placeholder::{PlaceholderSpec, PlaceholderStyle, render_placeholder};
pub use crate::assets::resolver::{PlaceholderRecord, ResolvedAssets, resolve_assets};
pub use crate::assets::store::{AssetStore, FsAssetStore, MemoryAssetStore};
pub use crate::compose::bounds::{Bounds, compute_bounds};
pub use crate::compose::frame::{Frame, resolve_frame};
pub use crate::diagnostics::{Diagnostic, Diagnostics, Stage};
pub use crate::document::{Document, Layer};
pub use crate::encode::sink::{DirectorySink, DocumentSink, InMemorySink};
pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Vec2};
pub use crate::foundation::error::{LayerforgeError, LayerforgeResult};
pub use crate::layout::kind::ElementKind;
pub use crate::layout::load::Layout;
pub use crate::layout::model::{Element, ElementColors, FontSpec, Position, Size};
pub use crate::pipeline::{ComposeOutcome, ComposeRequest, ImageLayoutOpts, compose, layout_from_image};
pub use crate::render::raster::LayerRaster;
