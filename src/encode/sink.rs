use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::assets::decode::encode_png;
use crate::assets::placeholder::slugify;
use crate::compose::frame::Frame;
use crate::document::Document;
use crate::foundation::error::LayerforgeResult;

/// Consumer of finished documents: the encoder seam.
///
/// Documents arrive with layers top-most first.
pub trait DocumentSink {
    /// Encode or store one document.
    fn write_document(&mut self, doc: &Document) -> LayerforgeResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    documents: Vec<Document>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents written so far, in order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl DocumentSink for InMemorySink {
    fn write_document(&mut self, doc: &Document) -> LayerforgeResult<()> {
        self.documents.push(doc.clone());
        Ok(())
    }
}

/// Name of the manifest written by [`DirectorySink`].
pub const MANIFEST_FILE: &str = "document.json";
/// Name of the flattened preview written by [`DirectorySink`] when enabled.
pub const PREVIEW_FILE: &str = "preview.png";

/// Manifest describing a document written to a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentManifest {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Layer ordering convention of `layers`.
    pub order: &'static str,
    /// One entry per layer, top-most first.
    pub layers: Vec<ManifestLayer>,
    /// Flattened preview file, when written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Manifest entry for one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestLayer {
    /// Layer name.
    pub name: String,
    /// Source element index.
    pub element_index: usize,
    /// Renderer kind.
    pub kind: &'static str,
    /// Canvas placement.
    pub frame: Frame,
    /// Layer opacity, 0..=255.
    pub opacity: u8,
    /// PNG file (straight alpha) relative to the output directory.
    pub file: String,
}

/// Sink writing one PNG per layer plus a JSON manifest into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    preview: bool,
    manifests: Vec<DocumentManifest>,
}

impl DirectorySink {
    /// Sink writing into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            preview: false,
            manifests: Vec::new(),
        }
    }

    /// Also write a flattened `preview.png`.
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Manifests written so far.
    pub fn manifests(&self) -> &[DocumentManifest] {
        &self.manifests
    }

    fn write_png(&self, file: &str, straight: &[u8], w: u32, h: u32) -> LayerforgeResult<()> {
        let bytes = encode_png(straight, w, h)?;
        let path = self.dir.join(file);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

impl DocumentSink for DirectorySink {
    fn write_document(&mut self, doc: &Document) -> LayerforgeResult<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output directory {}", self.dir.display()))?;

        let mut layers = Vec::with_capacity(doc.children.len());
        for (i, layer) in doc.children.iter().enumerate() {
            let slug = slugify(Some(&layer.name), layer.element_index);
            let file = format!("layer-{:02}-{slug}.png", i + 1);
            self.write_png(
                &file,
                &layer.raster.to_straight_rgba8(),
                layer.raster.width,
                layer.raster.height,
            )?;
            layers.push(ManifestLayer {
                name: layer.name.clone(),
                element_index: layer.element_index,
                kind: layer.kind.as_str(),
                frame: layer.frame,
                opacity: layer.opacity,
                file,
            });
        }

        let preview = if self.preview {
            let flat = doc.flatten();
            self.write_png(PREVIEW_FILE, &flat.to_straight_rgba8(), flat.width, flat.height)?;
            Some(PREVIEW_FILE.to_owned())
        } else {
            None
        };

        let manifest = DocumentManifest {
            width: doc.width,
            height: doc.height,
            order: "top-most first",
            layers,
            preview,
        };
        let path = self.dir.join(MANIFEST_FILE);
        let file = fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &manifest)
            .with_context(|| format!("write {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flush {}", path.display()))?;
        tracing::debug!(dir = %self.dir.display(), layers = manifest.layers.len(), "wrote document");

        self.manifests.push(manifest);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
