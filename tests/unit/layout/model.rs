use super::*;
use serde_json::json;

fn el(v: Value) -> Element {
    serde_json::from_value(v).unwrap()
}

#[test]
fn accepts_camel_case_aliases() {
    let e = el(json!({
        "type": "Image",
        "zOrder": 3,
        "imageSource": "a.png",
        "cornerRadius": 6,
        "strokeWidth": "2",
        "text": "hi"
    }));
    assert_eq!(e.z_order(), 3.0);
    assert_eq!(e.image_source(), Some("a.png"));
    assert_eq!(e.radius(), 6.0);
    assert_eq!(e.stroke_width(), 2.0);
    assert_eq!(e.text(), "hi");
}

#[test]
fn snake_case_wins_over_camel_case() {
    let e = el(json!({"z_order": 1, "zOrder": 9}));
    assert_eq!(e.z_order(), 1.0);
}

#[test]
fn defaults_for_missing_fields() {
    let e = el(json!({}));
    assert_eq!(e.type_name, "");
    assert_eq!(e.position, Position::new(0.0, 0.0));
    assert_eq!(e.z_order(), 0.0);
    assert_eq!(e.opacity(), 1.0);
    assert_eq!(e.opacity_u8(), 255);
    assert!(e.size.is_none());
    assert_eq!(e.image_source(), None);
}

#[test]
fn junk_coordinates_become_nan_and_junk_sizes_unset() {
    let e = el(json!({"position": {"x": "left", "y": 4}, "size": {"width": "wide", "height": 20}}));
    assert!(e.position.x.is_nan());
    assert_eq!(e.position.y, 4.0);
    assert_eq!(e.width(), None);
    assert_eq!(e.height(), Some(20.0));

    let e = el(json!({"position": "top-left"}));
    assert!(e.position.x.is_nan());
}

#[test]
fn opacity_is_clamped() {
    assert_eq!(el(json!({"opacity": 2})).opacity(), 1.0);
    assert_eq!(el(json!({"opacity": -1})).opacity_u8(), 0);
    assert_eq!(el(json!({"opacity": 0.5})).opacity_u8(), 128);
}

#[test]
fn font_tolerates_numbers_and_single_paths() {
    let e = el(json!({
        "font": {"size": "18", "weight": 700, "lineHeight": 24, "paths": "fonts/a.ttf",
                 "verticalAlignment": "top"}
    }));
    let f = e.font.unwrap();
    assert_eq!(f.size, Some(18.0));
    assert_eq!(f.weight.as_deref(), Some("700"));
    assert_eq!(f.line_height, Some(24.0));
    assert_eq!(f.paths, vec!["fonts/a.ttf".to_owned()]);
    assert_eq!(f.vertical_alignment.as_deref(), Some("top"));
}

#[test]
fn unknown_keys_round_trip() {
    let e = el(json!({"type": "Border", "id": "x1", "visible": true}));
    assert_eq!(e.extra.get("id"), Some(&json!("x1")));
    let back = serde_json::to_value(&e).unwrap();
    assert_eq!(back["id"], json!("x1"));
    assert_eq!(back["type"], json!("Border"));
    assert!(back.get("zOrder").is_none());
}

#[test]
fn unusable_position_survives_write_back() {
    let junk = json!({"type": "Border", "position": {"x": "left", "y": 4}});
    let e = el(junk.clone());
    assert!(!e.position.is_valid());

    let back = serde_json::to_value(&e).unwrap();
    assert_eq!(back["position"], junk["position"]);

    let again = el(back);
    assert!(again.position.x.is_nan());
    assert_eq!(again.position.y, 4.0);

    let scalar = el(json!({"position": "oops"}));
    assert!(!scalar.position.is_valid());
    assert_eq!(serde_json::to_value(&scalar).unwrap()["position"], json!("oops"));
}

#[test]
fn valid_position_is_not_copied_into_extra() {
    let e = el(json!({"position": {"x": "12", "y": 3}}));
    assert!(e.extra.is_empty());
    let back = serde_json::to_value(&e).unwrap();
    assert_eq!(back["position"], json!({"x": 12.0, "y": 3.0}));
}

#[test]
fn display_name_falls_back_to_type_and_index() {
    assert_eq!(el(json!({"type": "Text"})).display_name(2), "text-3");
    assert_eq!(el(json!({"name": " Hero "})).display_name(0), "Hero");
    assert_eq!(el(json!({})).display_name(0), "element-1");
}
