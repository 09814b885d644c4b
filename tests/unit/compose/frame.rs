use super::*;
use crate::layout::model::{FontSpec, Position, Size};

#[test]
fn declared_geometry_is_offset_and_rounded() {
    let mut el = Element::new("Border");
    el.position = Position::new(10.4, -2.6);
    el.size = Some(Size::new(20.5, 9.4));
    let f = resolve_frame(&el, ElementKind::Border, Vec2::new(5.0, 5.0)).unwrap();
    assert_eq!(
        f,
        Frame {
            left: 15,
            top: 2,
            width: 21,
            height: 9
        }
    );
    assert_eq!((f.right(), f.bottom()), (36, 11));
}

#[test]
fn text_fallback_grows_with_content() {
    let mut el = Element::new("Text");
    el.content = Some("x".repeat(20));
    assert_eq!(fallback_size(&el, ElementKind::Text), (240.0, 48.0));

    el.content = Some("short".to_owned());
    assert_eq!(fallback_size(&el, ElementKind::Text), (128.0, 48.0));

    el.content = Some("y".repeat(500));
    el.font = Some(FontSpec {
        size: Some(40.0),
        ..FontSpec::default()
    });
    assert_eq!(fallback_size(&el, ElementKind::Text), (1400.0, 64.0));
}

#[test]
fn control_is_text_sized_only_with_content() {
    let mut el = Element::new("Button");
    assert_eq!(fallback_size(&el, ElementKind::Control), (256.0, 256.0));
    el.content = Some("Submit".to_owned());
    assert_eq!(fallback_size(&el, ElementKind::Control), (128.0, 48.0));
}

#[test]
fn image_fallback_prefers_preferred_size() {
    let mut el = Element::new("Image");
    assert_eq!(fallback_size(&el, ElementKind::Image), (256.0, 256.0));
    el.preferred_size = Some(Size {
        width: Some(64.0),
        height: None,
    });
    assert_eq!(fallback_size(&el, ElementKind::Image), (64.0, 256.0));
}

#[test]
fn partial_size_mixes_declared_and_fallback() {
    let mut el = Element::new("Rectangle");
    el.size = Some(Size {
        width: None,
        height: Some(30.0),
    });
    let f = resolve_frame(&el, ElementKind::Border, Vec2::ZERO).unwrap();
    assert_eq!((f.width, f.height), (256, 30));
}

#[test]
fn unusable_geometry_has_no_frame() {
    let mut el = Element::new("Border");
    el.size = Some(Size::new(0.2, 10.0));
    assert!(resolve_frame(&el, ElementKind::Border, Vec2::ZERO).is_none());

    el.size = Some(Size::new(-5.0, 10.0));
    assert!(resolve_frame(&el, ElementKind::Border, Vec2::ZERO).is_none());

    el.size = Some(Size::new(5.0, 10.0));
    el.position = Position::new(f64::NAN, 0.0);
    assert!(resolve_frame(&el, ElementKind::Border, Vec2::ZERO).is_none());
}
