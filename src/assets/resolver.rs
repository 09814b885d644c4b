use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assets::decode::probe_dimensions;
use crate::assets::placeholder::{PlaceholderSpec, PlaceholderStyle, render_placeholder, slugify};
use crate::assets::store::{AssetStore, SourceRef, is_absolute_url};
use crate::diagnostics::{Diagnostics, Stage};
use crate::foundation::error::LayerforgeResult;
use crate::layout::kind::wants_placeholder;
use crate::layout::model::{Element, Size};
use crate::render::raster::check_layer_size;

/// Edge length used for placeholder axes the element does not declare.
pub const PLACEHOLDER_EDGE: u32 = 256;

/// Sub-directory of the asset directory that receives generated placeholders.
pub const PLACEHOLDER_DIR: &str = "placeholders";

/// Knobs for one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Directory placeholders are written under (`<asset_dir>/placeholders/`).
    pub asset_dir: PathBuf,
    /// Directory relative image sources are resolved against.
    pub layout_base_dir: PathBuf,
    /// Background style for generated placeholders.
    pub style: PlaceholderStyle,
    /// Label forced onto every placeholder, ahead of element labels and names.
    pub label: Option<String>,
}

/// One generated placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderRecord {
    /// Index of the element that received it.
    pub element_index: usize,
    /// Element display name.
    pub element_name: String,
    /// File the placeholder was written to.
    pub path: PathBuf,
}

/// Output of [`resolve_assets`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssets {
    /// Copy of the input with sources rewritten and sizes backfilled.
    pub elements: Vec<Element>,
    /// Placeholders written, in element order.
    pub placeholders: Vec<PlaceholderRecord>,
    /// Recoverable problems met along the way.
    pub diagnostics: Diagnostics,
}

/// Give every `image` element a usable source and, where possible, a complete size.
///
/// Elements whose source is empty or a missing local file get a generated placeholder written
/// through `store`, and take its size for any axis they leave unset; URLs are never probed for
/// existence. Other sources fill missing axes from the image's natural size. Only placeholder
/// writes are fatal.
#[tracing::instrument(skip_all, fields(elements = elements.len()))]
pub fn resolve_assets(
    elements: &[Element],
    opts: &ResolveOptions,
    store: &dyn AssetStore,
) -> LayerforgeResult<ResolvedAssets> {
    let mut out = Vec::with_capacity(elements.len());
    let mut placeholders = Vec::new();
    let mut diagnostics = Diagnostics::new();

    for (index, original) in elements.iter().enumerate() {
        let mut element = original.clone();
        if !wants_placeholder(&element.type_name) {
            out.push(element);
            continue;
        }

        if needs_placeholder(&element, &opts.layout_base_dir, store) {
            let width = placeholder_axis(element.width());
            let height = placeholder_axis(element.height());
            if let Err(e) = check_layer_size(width, height) {
                diagnostics.warn_element(
                    Stage::Assets,
                    index,
                    element.display_name(index),
                    format!("placeholder skipped: {e}"),
                );
                out.push(element);
                continue;
            }
            let path = write_placeholder(&element, index, (width, height), opts, store)?;
            element.image_source = Some(source_for(&path, &opts.layout_base_dir));
            let size = element.size.unwrap_or_default();
            element.size = Some(Size {
                width: size.width.or(Some(f64::from(width))),
                height: size.height.or(Some(f64::from(height))),
            });
            placeholders.push(PlaceholderRecord {
                element_index: index,
                element_name: element.display_name(index),
                path,
            });
        } else {
            backfill_size(&mut element, index, &opts.layout_base_dir, store, &mut diagnostics);
        }
        out.push(element);
    }

    Ok(ResolvedAssets {
        elements: out,
        placeholders,
        diagnostics,
    })
}

fn needs_placeholder(element: &Element, base_dir: &Path, store: &dyn AssetStore) -> bool {
    match element.image_source() {
        None => true,
        Some(src) if is_absolute_url(src) => false,
        Some(src) => !store.exists(&base_dir.join(src)),
    }
}

fn placeholder_label(element: &Element, opts: &ResolveOptions) -> String {
    [
        opts.label.as_deref(),
        element.label.as_deref(),
        element.name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .unwrap_or("Image")
    .to_owned()
}

fn placeholder_axis(v: Option<f64>) -> u32 {
    match v {
        Some(v) if v.is_finite() && v.round() >= 1.0 => v.round().min(f64::from(u16::MAX)) as u32,
        _ => PLACEHOLDER_EDGE,
    }
}

fn write_placeholder(
    element: &Element,
    index: usize,
    (width, height): (u32, u32),
    opts: &ResolveOptions,
    store: &dyn AssetStore,
) -> LayerforgeResult<PathBuf> {
    let spec = PlaceholderSpec {
        width,
        height,
        style: opts.style,
        label: placeholder_label(element, opts),
        radius: element.radius(),
    };
    let bytes = render_placeholder(&spec)?;

    let file = format!("{}.png", slugify(element.name.as_deref(), index));
    let path = opts.asset_dir.join(PLACEHOLDER_DIR).join(file);
    store.write(&path, &bytes)?;
    tracing::debug!(
        index,
        path = %path.display(),
        width = spec.width,
        height = spec.height,
        "wrote placeholder"
    );
    Ok(path)
}

/// Source string for `path`: relative to `base_dir` when it lies underneath, absolute otherwise.
fn source_for(path: &Path, base_dir: &Path) -> String {
    if base_dir.as_os_str().is_empty() {
        return path.to_string_lossy().into_owned();
    }
    if let Ok(rel) = path.strip_prefix(base_dir) {
        return rel.to_string_lossy().into_owned();
    }
    match (std::path::absolute(path), std::path::absolute(base_dir)) {
        (Ok(abs_path), Ok(abs_base)) => match abs_path.strip_prefix(&abs_base) {
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => abs_path.to_string_lossy().into_owned(),
        },
        (Ok(abs_path), Err(_)) => abs_path.to_string_lossy().into_owned(),
        _ => path.to_string_lossy().into_owned(),
    }
}

fn backfill_size(
    element: &mut Element,
    index: usize,
    base_dir: &Path,
    store: &dyn AssetStore,
    diagnostics: &mut Diagnostics,
) {
    let size = element.size.unwrap_or_default();
    if size.is_complete() {
        return;
    }
    let Some(src) = element.image_source() else {
        return;
    };
    let source = SourceRef::resolve(src, base_dir);

    let probed = source
        .load(store)
        .and_then(|bytes| probe_dimensions(&bytes));
    match probed {
        Ok((w, h)) => {
            element.size = Some(Size {
                width: size.width.or(Some(f64::from(w))),
                height: size.height.or(Some(f64::from(h))),
            });
        }
        Err(e) => {
            diagnostics.warn_element(
                Stage::Assets,
                index,
                element.display_name(index),
                format!("could not probe size of {}: {e}", source.describe()),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
