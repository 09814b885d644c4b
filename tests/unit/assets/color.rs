use super::*;
use serde_json::json;

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(Rgba8::parse("#111").unwrap(), Rgba8::opaque(0x11, 0x11, 0x11));
    assert_eq!(Rgba8::parse("#ff000080").unwrap(), Rgba8::new(255, 0, 0, 128));
    assert_eq!(Rgba8::parse("#0f08").unwrap(), Rgba8::new(0, 0xff, 0, 0x88));
    assert_eq!(Rgba8::parse("#3366CC").unwrap(), Rgba8::opaque(0x33, 0x66, 0xcc));
    assert!(Rgba8::parse("#12345").is_err());
    assert!(Rgba8::parse("#zzz").is_err());
}

#[test]
fn parses_rgb_functions_and_names() {
    assert_eq!(
        Rgba8::parse("rgb(10, 20, 30)").unwrap(),
        Rgba8::opaque(10, 20, 30)
    );
    assert_eq!(
        Rgba8::parse("RGBA(255, 255, 255, 0.5)").unwrap(),
        Rgba8::new(255, 255, 255, 128)
    );
    assert_eq!(
        Rgba8::parse("rgba(0 0 0 / 25%)").unwrap(),
        Rgba8::new(0, 0, 0, 64)
    );
    assert_eq!(Rgba8::parse("White").unwrap(), Rgba8::opaque(255, 255, 255));
    assert!(Rgba8::parse("transparent").unwrap().is_invisible());
    assert!(Rgba8::parse("blurple").is_err());
}

#[test]
fn colour_value_never_fails_to_deserialize() {
    let ok: ColorValue = serde_json::from_value(json!("#111")).unwrap();
    assert_eq!(ok.resolve().unwrap(), Rgba8::opaque(0x11, 0x11, 0x11));

    let obj: ColorValue = serde_json::from_value(json!({"r": 1.0, "g": 0.0, "b": 0.0})).unwrap();
    assert_eq!(obj, ColorValue::Rgba(Rgba8::opaque(255, 0, 0)));

    let bad: ColorValue = serde_json::from_value(json!("not-a-colour")).unwrap();
    assert_eq!(bad, ColorValue::Invalid("not-a-colour".to_owned()));
    assert!(bad.resolve().is_err());

    let weird: ColorValue = serde_json::from_value(json!(42)).unwrap();
    assert!(matches!(weird, ColorValue::Invalid(_)));
}

#[test]
fn serializes_as_hex() {
    let v = serde_json::to_value(ColorValue::Rgba(Rgba8::new(1, 2, 3, 255))).unwrap();
    assert_eq!(v, json!("#010203"));
    let v = serde_json::to_value(ColorValue::Rgba(Rgba8::new(1, 2, 3, 4))).unwrap();
    assert_eq!(v, json!("#01020304"));
}

#[test]
fn alpha_scaling_clamps() {
    let c = Rgba8::opaque(9, 9, 9).with_alpha_scaled(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(Rgba8::opaque(9, 9, 9).with_alpha_scaled(3.0).a, 255);
}
