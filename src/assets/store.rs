use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{LayerforgeError, LayerforgeResult};

/// File and network access used by asset resolution and image rendering.
///
/// Calls are blocking and issued one at a time, in element order.
pub trait AssetStore {
    /// Whether a local file exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Read a local file.
    fn read(&self, path: &Path) -> LayerforgeResult<Vec<u8>>;
    /// Write a local file, creating parent directories as needed.
    fn write(&self, path: &Path, bytes: &[u8]) -> LayerforgeResult<()>;
    /// Fetch the body of an absolute URL.
    fn fetch_url(&self, url: &str) -> LayerforgeResult<Vec<u8>>;
}

/// Where an element's image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// Absolute `http`/`https` URL.
    Url(String),
    /// Local file, already joined onto the layout base directory.
    Local(PathBuf),
}

impl SourceRef {
    /// Classify `source` and resolve local paths against `base_dir`.
    pub fn resolve(source: &str, base_dir: &Path) -> Self {
        let source = source.trim();
        if is_absolute_url(source) {
            Self::Url(source.to_owned())
        } else {
            Self::Local(base_dir.join(source))
        }
    }

    /// Read the referenced bytes through `store`.
    pub fn load(&self, store: &dyn AssetStore) -> LayerforgeResult<Vec<u8>> {
        match self {
            Self::Url(url) => store.fetch_url(url),
            Self::Local(path) => store.read(path),
        }
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// Whether `s` is an absolute `http` or `https` URL.
///
/// Other schemes are treated as local paths, so Windows drive letters (`C:\...`) are never
/// mistaken for URLs.
pub fn is_absolute_url(s: &str) -> bool {
    match url::Url::parse(s.trim()) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.has_host(),
        Err(_) => false,
    }
}

/// [`AssetStore`] backed by the local filesystem.
///
/// Remote fetching needs the `http` cargo feature; without it `fetch_url` always fails, which
/// callers treat as a recoverable per-element problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetStore;

impl FsAssetStore {
    /// Construct the default filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl AssetStore for FsAssetStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> LayerforgeResult<Vec<u8>> {
        std::fs::read(path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(LayerforgeError::from)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> LayerforgeResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create asset dir '{}'", parent.display()))?;
        }
        std::fs::write(path, bytes)
            .with_context(|| format!("write asset '{}'", path.display()))
            .map_err(LayerforgeError::from)
    }

    #[cfg(feature = "http")]
    fn fetch_url(&self, url: &str) -> LayerforgeResult<Vec<u8>> {
        let resp = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| LayerforgeError::asset(format!("fetch '{url}': {e}")))?;
        let bytes = resp
            .bytes()
            .map_err(|e| LayerforgeError::asset(format!("read body of '{url}': {e}")))?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "http"))]
    fn fetch_url(&self, url: &str) -> LayerforgeResult<Vec<u8>> {
        Err(LayerforgeError::asset(format!(
            "cannot fetch '{url}': built without the `http` feature"
        )))
    }
}

/// In-memory [`AssetStore`] for tests and embedding.
///
/// Files and URLs live in separate maps. Writes land in the file map, so a placeholder written
/// during resolution is readable by the renderer afterwards.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    urls: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a local file.
    pub fn with_file(self, path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        self.files.borrow_mut().insert(path.into(), bytes);
        self
    }

    /// Seed a URL response.
    pub fn with_url(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.urls.insert(url.into(), bytes);
        self
    }

    /// Paths currently stored, in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl AssetStore for MemoryAssetStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> LayerforgeResult<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| LayerforgeError::asset(format!("no such file '{}'", path.display())))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> LayerforgeResult<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn fetch_url(&self, url: &str) -> LayerforgeResult<Vec<u8>> {
        self.urls
            .get(url)
            .cloned()
            .ok_or_else(|| LayerforgeError::asset(format!("no response for '{url}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
