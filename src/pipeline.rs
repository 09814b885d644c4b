//! End-to-end entry points: layout → layered document, and image → layout.

use std::path::{Path, PathBuf};

use crate::assets::color::{ColorValue, Rgba8};
use crate::assets::decode::probe_dimensions;
use crate::assets::placeholder::PlaceholderStyle;
use crate::assets::resolver::{PlaceholderRecord, ResolveOptions, resolve_assets};
use crate::assets::store::AssetStore;
use crate::compose::bounds::{Bounds, compute_bounds};
use crate::compose::compositor::compose_document;
use crate::diagnostics::Diagnostics;
use crate::document::Document;
use crate::foundation::error::{LayerforgeError, LayerforgeResult};
use crate::layout::model::{Element, ElementColors, Position, Size};
use crate::render::RenderContext;

/// Everything one composition needs.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    /// Raw layout elements. Never mutated; resolution works on a copy.
    pub elements: Vec<Element>,
    /// Margin added around the layout on every side.
    pub margin: u32,
    /// Directory generated placeholders are written under.
    pub asset_dir: PathBuf,
    /// Directory relative sources and font paths resolve against.
    pub layout_base_dir: PathBuf,
    /// Background style for generated placeholders.
    pub placeholder_style: PlaceholderStyle,
    /// Label forced onto every placeholder.
    pub placeholder_label: Option<String>,
}

impl ComposeRequest {
    /// Request with no margin and default placeholder styling.
    pub fn new(
        elements: Vec<Element>,
        asset_dir: impl Into<PathBuf>,
        layout_base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            elements,
            margin: 0,
            asset_dir: asset_dir.into(),
            layout_base_dir: layout_base_dir.into(),
            placeholder_style: PlaceholderStyle::default(),
            placeholder_label: None,
        }
    }

    /// Set the margin.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the placeholder style.
    pub fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }

    /// Force a label onto every placeholder.
    pub fn with_placeholder_label(mut self, label: impl Into<String>) -> Self {
        self.placeholder_label = Some(label.into());
        self
    }
}

/// Result of [`compose`].
#[derive(Debug, Clone)]
pub struct ComposeOutcome {
    /// Layered document, top-most layer first.
    pub document: Document,
    /// Canvas bounds the document was laid out in.
    pub bounds: Bounds,
    /// Number of layers in `document`.
    pub layer_count: usize,
    /// Placeholders generated for missing images.
    pub placeholders: Vec<PlaceholderRecord>,
    /// Recoverable problems from resolution and rendering, in order.
    pub diagnostics: Diagnostics,
    /// Resolved elements: rewritten sources and backfilled sizes.
    pub elements: Vec<Element>,
}

/// Resolve assets, compute bounds and composite the layout into a layered document.
#[tracing::instrument(skip_all, fields(elements = req.elements.len(), margin = req.margin))]
pub fn compose(req: &ComposeRequest, store: &dyn AssetStore) -> LayerforgeResult<ComposeOutcome> {
    let resolved = resolve_assets(
        &req.elements,
        &ResolveOptions {
            asset_dir: req.asset_dir.clone(),
            layout_base_dir: req.layout_base_dir.clone(),
            style: req.placeholder_style,
            label: req.placeholder_label.clone(),
        },
        store,
    )?;

    let bounds = compute_bounds(&resolved.elements, req.margin);
    let mut ctx = RenderContext::new(store, req.layout_base_dir.clone());
    let composed = compose_document(&resolved.elements, &bounds, &mut ctx);

    let mut diagnostics = resolved.diagnostics;
    diagnostics.extend(ctx.into_diagnostics());
    tracing::info!(
        width = bounds.width,
        height = bounds.height,
        layers = composed.layer_count,
        placeholders = resolved.placeholders.len(),
        warnings = diagnostics.len(),
        "composed layout"
    );

    Ok(ComposeOutcome {
        document: composed.document,
        bounds,
        layer_count: composed.layer_count,
        placeholders: resolved.placeholders,
        diagnostics,
        elements: resolved.elements,
    })
}

/// Options for [`layout_from_image`].
#[derive(Debug, Clone)]
pub struct ImageLayoutOpts {
    /// Element name; defaults to the image file stem.
    pub name: Option<String>,
    /// Top-left corner of both elements.
    pub position: Position,
    /// Border stroke width; `0` skips the border element.
    pub border_width: f64,
    /// Border colour; black when unset.
    pub border_color: Option<Rgba8>,
    /// Corner radius shared by both elements.
    pub border_radius: f64,
    /// Directory the image source is written relative to.
    pub layout_base_dir: PathBuf,
}

impl Default for ImageLayoutOpts {
    fn default() -> Self {
        Self {
            name: None,
            position: Position::default(),
            border_width: 0.0,
            border_color: None,
            border_radius: 0.0,
            layout_base_dir: PathBuf::from("."),
        }
    }
}

/// Wrap one image into a layout: an optional border element under the image element.
///
/// The image's natural size becomes the frame of both elements.
#[tracing::instrument(skip(opts, store), fields(image = %image_path.display()))]
pub fn layout_from_image(
    image_path: &Path,
    opts: &ImageLayoutOpts,
    store: &dyn AssetStore,
) -> LayerforgeResult<Vec<Element>> {
    if !store.exists(image_path) {
        return Err(LayerforgeError::validation(format!(
            "image not found: {}",
            image_path.display()
        )));
    }
    let bytes = store.read(image_path)?;
    let (w, h) = probe_dimensions(&bytes)?;
    let size = Size::new(f64::from(w), f64::from(h));

    let name = opts
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            image_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "Image".to_owned());
    let radius = (opts.border_radius > 0.0).then_some(opts.border_radius);

    let mut elements = Vec::with_capacity(2);
    if opts.border_width > 0.0 {
        let mut border = Element::new("Border");
        border.name = Some(format!("{name} Border"));
        border.position = opts.position;
        border.size = Some(size);
        border.z_order = Some(0.0);
        border.border_width = Some(opts.border_width);
        border.border_radius = radius;
        border.color = Some(ElementColors {
            border: Some(ColorValue::from(
                opts.border_color.unwrap_or(Rgba8::opaque(0, 0, 0)),
            )),
            ..ElementColors::default()
        });
        elements.push(border);
    }

    let mut image = Element::new("Image");
    image.name = Some(name);
    image.position = opts.position;
    image.size = Some(size);
    image.z_order = Some(1.0);
    image.border_radius = radius;
    image.image_source = Some(relative_source(image_path, &opts.layout_base_dir));
    elements.push(image);

    Ok(elements)
}

fn relative_source(path: &Path, base_dir: &Path) -> String {
    let rel = match (std::path::absolute(path), std::path::absolute(base_dir)) {
        (Ok(p), Ok(b)) => p.strip_prefix(&b).map(Path::to_path_buf).unwrap_or(p),
        _ => path.to_path_buf(),
    };
    rel.to_string_lossy().into_owned()
}
