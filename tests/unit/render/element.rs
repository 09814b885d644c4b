use std::io::Cursor;

use super::*;
use crate::assets::color::ColorValue;
use crate::assets::store::MemoryAssetStore;
use crate::layout::model::{ElementColors, FontSpec};

fn frame(width: u32, height: u32) -> Frame {
    Frame {
        left: 0,
        top: 0,
        width,
        height,
    }
}

fn solid_png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn colors(background: Option<&str>, border: Option<&str>) -> ElementColors {
    let parse = |s: &str| match Rgba8::parse(s) {
        Ok(c) => ColorValue::Rgba(c),
        Err(_) => ColorValue::Invalid(s.to_owned()),
    };
    ElementColors {
        background: background.map(parse),
        border: border.map(parse),
        text: None,
    }
}

#[test]
fn border_fills_frame_and_keeps_opacity_separate() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("Border");
    el.name = Some("Panel".to_owned());
    el.opacity = Some(0.5);
    el.color = Some(colors(Some("#ff0000"), None));

    let layer = ElementKind::Border
        .render(&mut ctx, &el, 3, frame(12, 6))
        .unwrap()
        .unwrap();
    assert_eq!(layer.name, "Panel");
    assert_eq!(layer.element_index, 3);
    assert_eq!(layer.kind, ElementKind::Border);
    assert_eq!(layer.opacity, 128);
    assert_eq!(layer.raster.pixel(6, 3), Some([255, 0, 0, 255]));
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn border_without_visible_paint_draws_nothing() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("Rectangle");
    assert!(ElementKind::Border.render(&mut ctx, &el, 0, frame(8, 8)).unwrap().is_none());

    el.color = Some(colors(Some("transparent"), Some("#000")));
    el.border_width = Some(0.0);
    assert!(ElementKind::Border.render(&mut ctx, &el, 0, frame(8, 8)).unwrap().is_none());
}

#[test]
fn stroke_only_border_leaves_centre_empty() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("Border");
    el.border_width = Some(2.0);
    el.color = Some(colors(None, Some("#00ff00")));

    let layer = ElementKind::Border
        .render(&mut ctx, &el, 0, frame(20, 20))
        .unwrap()
        .unwrap();
    assert_eq!(layer.raster.pixel(10, 10).unwrap()[3], 0);
    assert!(!layer.raster.is_blank());
}

#[test]
fn invalid_colour_is_reported_and_treated_as_unset() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("Border");
    el.color = Some(colors(Some("not-a-colour"), None));

    assert!(ElementKind::Border.render(&mut ctx, &el, 1, frame(8, 8)).unwrap().is_none());
    let diags = ctx.into_diagnostics();
    assert_eq!(diags.len(), 1);
    let d = &diags.entries()[0];
    assert_eq!(d.stage, Stage::Render);
    assert_eq!(d.element_index, Some(1));
    assert_eq!(d.element.as_deref(), Some("border-2"));
    assert!(d.message.starts_with("background colour"));
}

#[test]
fn empty_text_draws_nothing() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let el = Element::new("TextBlock");
    assert!(ElementKind::Text.render(&mut ctx, &el, 0, frame(64, 48)).unwrap().is_none());
}

#[test]
fn control_without_panel_renders_as_text() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("Button");
    el.content = Some("OK".to_owned());

    let layer = ElementKind::Control
        .render(&mut ctx, &el, 0, frame(64, 48))
        .unwrap()
        .unwrap();
    assert_eq!(layer.kind, ElementKind::Control);
    assert_eq!((layer.raster.width, layer.raster.height), (64, 48));

    let empty = Element::new("Button");
    assert!(ElementKind::Control.render(&mut ctx, &empty, 1, frame(64, 48)).unwrap().is_none());
}

#[test]
fn control_panel_keeps_its_fill() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("TextBox");
    el.content = Some("name".to_owned());
    el.color = Some(colors(Some("#0000ff"), None));
    el.font = Some(FontSpec {
        alignment: Some("left".to_owned()),
        ..FontSpec::default()
    });

    let layer = ElementKind::Control
        .render(&mut ctx, &el, 0, frame(80, 30))
        .unwrap()
        .unwrap();
    assert_eq!(layer.raster.pixel(78, 2), Some([0, 0, 255, 255]));
}

#[test]
fn text_style_defaults_by_kind() {
    let store = MemoryAssetStore::new();
    let mut ctx = RenderContext::new(&store, "");
    let mut el = Element::new("Button");
    el.font = Some(FontSpec {
        weight: Some("bold".to_owned()),
        style: Some("Oblique".to_owned()),
        line_height: Some(4.0),
        ..FontSpec::default()
    });

    let control = text_style(&mut ctx, &el, 0, "b", ElementKind::Control);
    assert_eq!(control.size, 14.0);
    assert_eq!(control.line_height, 14.0);
    assert_eq!(control.weight, 700.0);
    assert!(control.italic);
    assert_eq!(control.align, HAlign::Center);
    assert_eq!(control.valign, VAlign::Middle);
    assert_eq!(control.color, DEFAULT_TEXT_COLOR);

    let text = text_style(&mut ctx, &Element::new("Text"), 0, "t", ElementKind::Text);
    assert_eq!(text.size, 16.0);
    assert_eq!(text.align, HAlign::Left);
    assert!(!text.italic);
    assert_eq!(text.weight, 400.0);
}

#[test]
fn image_is_stretched_and_clipped_to_radius() {
    let store = MemoryAssetStore::new().with_file("base/pic.png", solid_png(2, 2, [0, 255, 0, 255]));
    let mut ctx = RenderContext::new(&store, "base");
    let mut el = Element::new("Image");
    el.image_source = Some("pic.png".to_owned());
    el.border_radius = Some(5.0);

    let layer = ElementKind::Image
        .render(&mut ctx, &el, 0, frame(10, 10))
        .unwrap()
        .unwrap();
    let centre = layer.raster.pixel(5, 5).unwrap();
    assert_eq!(centre[3], 255);
    assert!(centre[1] > 250 && centre[0] < 5);
    assert_eq!(layer.raster.pixel(0, 0).unwrap()[3], 0);
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn image_problems_are_diagnostics_not_errors() {
    let store = MemoryAssetStore::new().with_file("junk.png", b"definitely not an image".to_vec());
    let mut ctx = RenderContext::new(&store, "");

    let no_source = Element::new("Image");
    let mut missing = Element::new("Image");
    missing.image_source = Some("nowhere.png".to_owned());
    let mut junk = Element::new("Image");
    junk.image_source = Some("junk.png".to_owned());

    for (i, el) in [no_source, missing, junk].iter().enumerate() {
        assert!(ElementKind::Image.render(&mut ctx, el, i, frame(4, 4)).unwrap().is_none());
    }

    let messages: Vec<&str> = ctx
        .diagnostics()
        .entries()
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "image has no source");
    assert!(messages[1].starts_with("failed to load image"));
    assert!(messages[2].starts_with("failed to decode image"));
}
