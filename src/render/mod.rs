//! Per-element rasterization on top of `vello_cpu`.

/// Premultiplied source-over compositing.
pub mod composite;
/// Per-kind element renderers.
pub mod element;
/// Layer pixel buffers and the drawing surface.
pub mod raster;
/// Parley text layout and glyph drawing.
pub mod text;

use std::path::{Path, PathBuf};

use crate::assets::color::{ColorValue, Rgba8};
use crate::assets::store::AssetStore;
use crate::diagnostics::{Diagnostics, Stage};
use crate::render::text::TextEngine;

/// State shared by every element rendered in one invocation.
///
/// Owns the text engine (font registrations, glyph font cache) and the diagnostics collected
/// while rendering. Nothing in here outlives the invocation.
pub struct RenderContext<'a> {
    store: &'a dyn AssetStore,
    base_dir: PathBuf,
    pub(crate) text: TextEngine,
    diagnostics: Diagnostics,
}

impl<'a> RenderContext<'a> {
    /// Context that reads assets through `store`, resolving local paths against `base_dir`.
    pub fn new(store: &'a dyn AssetStore, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            base_dir: base_dir.into(),
            text: TextEngine::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Asset store used for image and font reads.
    pub fn store(&self) -> &'a dyn AssetStore {
        self.store
    }

    /// Directory local sources are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Consume the context, keeping only its diagnostics.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Parse an optional colour slot, reporting unparseable values against the element.
    pub(crate) fn color(
        &mut self,
        value: Option<&ColorValue>,
        index: usize,
        name: &str,
        slot: &str,
    ) -> Option<Rgba8> {
        match value?.resolve() {
            Ok(c) => Some(c),
            Err(msg) => {
                self.diagnostics
                    .warn_element(Stage::Render, index, name, format!("{slot} colour: {msg}"));
                None
            }
        }
    }

    /// Register font files against the base directory and return their family names.
    pub(crate) fn register_fonts(&mut self, paths: &[String]) -> Vec<String> {
        if paths.is_empty() {
            return Vec::new();
        }
        self.text
            .register_font_paths(paths, &self.base_dir, self.store, &mut self.diagnostics)
    }
}
