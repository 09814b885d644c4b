use std::io::Cursor;

use super::*;
use crate::assets::store::MemoryAssetStore;
use crate::foundation::error::LayerforgeError;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::new(width, height);
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn opts(asset_dir: &str, base: &str) -> ResolveOptions {
    ResolveOptions {
        asset_dir: PathBuf::from(asset_dir),
        layout_base_dir: PathBuf::from(base),
        style: PlaceholderStyle::Solid,
        label: None,
    }
}

fn image(name: Option<&str>, source: Option<&str>) -> Element {
    let mut el = Element::new("Image");
    el.name = name.map(str::to_owned);
    el.image_source = source.map(str::to_owned);
    el
}

#[test]
fn missing_source_gets_placeholder_and_default_size() {
    let store = MemoryAssetStore::new();
    let elements = vec![image(Some("Hero Shot"), None)];
    let resolved = resolve_assets(&elements, &opts("out", ""), &store).unwrap();

    let expected = PathBuf::from("out/placeholders/hero-shot.png");
    assert_eq!(resolved.placeholders.len(), 1);
    assert_eq!(resolved.placeholders[0].path, expected);
    assert_eq!(resolved.placeholders[0].element_name, "Hero Shot");
    assert!(store.exists(&expected));

    let el = &resolved.elements[0];
    assert_eq!(el.image_source.as_deref(), Some("out/placeholders/hero-shot.png"));
    assert_eq!(el.size, Some(Size::new(256.0, 256.0)));
    assert!(resolved.diagnostics.is_empty());
}

#[test]
fn placeholder_uses_declared_size() {
    let store = MemoryAssetStore::new();
    let mut el = image(Some("Thumb"), Some("gone.png"));
    el.size = Some(Size {
        width: Some(40.0),
        height: None,
    });
    let resolved = resolve_assets(&[el], &opts("out", ""), &store).unwrap();

    let bytes = store.read(Path::new("out/placeholders/thumb.png")).unwrap();
    assert_eq!(probe_dimensions(&bytes).unwrap(), (40, 256));
    assert_eq!(resolved.elements[0].size, Some(Size::new(40.0, 256.0)));
}

#[test]
fn existing_file_is_kept_and_sized() {
    let store = MemoryAssetStore::new().with_file("pics/a.png", png(7, 3));
    let resolved = resolve_assets(&[image(None, Some("pics/a.png"))], &opts("out", ""), &store)
        .unwrap();
    assert!(resolved.placeholders.is_empty());
    assert_eq!(resolved.elements[0].image_source.as_deref(), Some("pics/a.png"));
    assert_eq!(resolved.elements[0].size, Some(Size::new(7.0, 3.0)));
}

#[test]
fn backfill_keeps_declared_axis() {
    let store = MemoryAssetStore::new().with_file("a.png", png(7, 3));
    let mut el = image(None, Some("a.png"));
    el.size = Some(Size {
        width: Some(70.0),
        height: None,
    });
    let resolved = resolve_assets(&[el], &opts("out", ""), &store).unwrap();
    assert_eq!(resolved.elements[0].size, Some(Size::new(70.0, 3.0)));
}

#[test]
fn sources_resolve_against_layout_dir() {
    let store = MemoryAssetStore::new().with_file("layouts/pics/a.png", png(5, 5));
    let elements = vec![
        image(Some("Real"), Some("pics/a.png")),
        image(Some("Fake"), Some("pics/b.png")),
    ];
    let resolved =
        resolve_assets(&elements, &opts("layouts/assets", "layouts"), &store).unwrap();

    assert_eq!(resolved.elements[0].image_source.as_deref(), Some("pics/a.png"));
    assert_eq!(resolved.elements[0].size, Some(Size::new(5.0, 5.0)));
    assert_eq!(
        resolved.elements[1].image_source.as_deref(),
        Some("assets/placeholders/fake.png")
    );
    assert!(store.exists(Path::new("layouts/assets/placeholders/fake.png")));
}

#[test]
fn urls_are_not_replaced_and_probe_failures_are_reported() {
    let store = MemoryAssetStore::new().with_url("https://cdn.test/ok.png", png(9, 4));
    let elements = vec![
        image(None, Some("https://cdn.test/ok.png")),
        image(Some("Remote"), Some("https://cdn.test/missing.png")),
    ];
    let resolved = resolve_assets(&elements, &opts("out", ""), &store).unwrap();

    assert!(resolved.placeholders.is_empty());
    assert_eq!(resolved.elements[0].size, Some(Size::new(9.0, 4.0)));
    assert_eq!(resolved.elements[1].size, None);
    assert_eq!(
        resolved.elements[1].image_source.as_deref(),
        Some("https://cdn.test/missing.png")
    );

    assert_eq!(resolved.diagnostics.len(), 1);
    let d = &resolved.diagnostics.entries()[0];
    assert_eq!(d.stage, Stage::Assets);
    assert_eq!(d.element_index, Some(1));
    assert!(d.message.starts_with("could not probe size"));
}

#[test]
fn only_plain_image_types_get_placeholders() {
    let store = MemoryAssetStore::new();
    let texture = Element::new("Texture");
    let border = Element::new("Border");
    let elements = vec![texture.clone(), border.clone()];
    let resolved = resolve_assets(&elements, &opts("out", ""), &store).unwrap();
    assert!(resolved.placeholders.is_empty());
    assert_eq!(resolved.elements, elements);
    assert!(store.paths().is_empty());
}

#[test]
fn unnamed_elements_are_numbered_and_input_is_untouched() {
    let store = MemoryAssetStore::new();
    let elements = vec![Element::new("Border"), image(None, Some("  "))];
    let before = elements.clone();
    let resolved = resolve_assets(&elements, &opts("out", ""), &store).unwrap();

    assert_eq!(elements, before);
    assert_eq!(
        resolved.placeholders[0].path,
        PathBuf::from("out/placeholders/image-2.png")
    );
    assert_eq!(resolved.placeholders[0].element_index, 1);
}

struct ReadOnlyStore;

impl AssetStore for ReadOnlyStore {
    fn exists(&self, _path: &Path) -> bool {
        false
    }
    fn read(&self, path: &Path) -> LayerforgeResult<Vec<u8>> {
        Err(LayerforgeError::asset(format!("no file {}", path.display())))
    }
    fn write(&self, path: &Path, _bytes: &[u8]) -> LayerforgeResult<()> {
        Err(LayerforgeError::asset(format!("read-only: {}", path.display())))
    }
    fn fetch_url(&self, url: &str) -> LayerforgeResult<Vec<u8>> {
        Err(LayerforgeError::asset(format!("offline: {url}")))
    }
}

#[test]
fn placeholder_write_failure_is_fatal() {
    let err = resolve_assets(&[image(None, None)], &opts("out", ""), &ReadOnlyStore).unwrap_err();
    assert!(matches!(err, LayerforgeError::Asset(_)));
}

#[test]
fn label_precedence() {
    let mut el = image(Some("Name"), None);
    el.label = Some("Label".to_owned());
    let mut o = opts("out", "");
    assert_eq!(placeholder_label(&el, &o), "Label");

    o.label = Some("Forced".to_owned());
    assert_eq!(placeholder_label(&el, &o), "Forced");

    o.label = Some("   ".to_owned());
    el.label = None;
    assert_eq!(placeholder_label(&el, &o), "Name");

    assert_eq!(placeholder_label(&image(None, None), &opts("out", "")), "Image");
}

#[test]
fn placeholder_axis_defaults() {
    assert_eq!(placeholder_axis(None), PLACEHOLDER_EDGE);
    assert_eq!(placeholder_axis(Some(0.2)), PLACEHOLDER_EDGE);
    assert_eq!(placeholder_axis(Some(f64::NAN)), PLACEHOLDER_EDGE);
    assert_eq!(placeholder_axis(Some(99.6)), 100);
}

#[test]
fn oversized_placeholder_is_skipped_with_a_diagnostic() {
    let store = MemoryAssetStore::new();
    let mut el = image(Some("Poster"), None);
    el.size = Some(Size::new(60_000.0, 60_000.0));
    let resolved = resolve_assets(&[el], &opts("out", ""), &store).unwrap();

    assert!(resolved.placeholders.is_empty());
    assert!(!store.exists(Path::new("out/placeholders/poster.png")));
    assert_eq!(resolved.elements[0].image_source, None);
    assert_eq!(resolved.diagnostics.len(), 1);
    let d = &resolved.diagnostics.entries()[0];
    assert_eq!(d.stage, Stage::Assets);
    assert_eq!(d.element_index, Some(0));
    assert!(d.message.contains("placeholder skipped"), "{}", d.message);
}
