use std::sync::Arc;

use super::*;
use crate::foundation::core::Rect;
use crate::foundation::geometry::{rounded_rect_path, stroke_outline_path};

fn full(surface: &Surface) -> BezPath {
    rounded_rect_path(Rect::new(0.0, 0.0, surface.width(), surface.height()), 0.0)
}

#[test]
fn surface_fill_covers_frame() {
    let mut s = Surface::new(16, 8).unwrap();
    let path = full(&s);
    s.fill_path(&path, Rgba8::opaque(200, 10, 20));
    let raster = s.finish();
    assert_eq!((raster.width, raster.height), (16, 8));
    assert_eq!(raster.data.len(), 16 * 8 * 4);
    assert_eq!(raster.pixel(8, 4), Some([200, 10, 20, 255]));
    assert_eq!(raster.pixel(0, 0), Some([200, 10, 20, 255]));
    assert_eq!(raster.pixel(16, 0), None);
}

#[test]
fn invisible_fill_leaves_surface_blank() {
    let mut s = Surface::new(4, 4).unwrap();
    let path = full(&s);
    s.fill_path(&path, Rgba8::transparent());
    assert!(s.finish().is_blank());
}

#[test]
fn surface_rejects_oversized_and_empty() {
    assert!(matches!(
        Surface::new(70_000, 10),
        Err(LayerforgeError::Render(_))
    ));
    assert!(matches!(Surface::new(10, 70_000), Err(LayerforgeError::Render(_))));
    assert!(matches!(Surface::new(0, 10), Err(LayerforgeError::Render(_))));
}

#[test]
fn layer_size_is_capped_per_edge_and_area() {
    assert!(check_layer_size(MAX_LAYER_DIM, 1).is_ok());
    assert!(check_layer_size(4096, 4096).is_ok());

    let err = check_layer_size(MAX_LAYER_DIM + 1, 1).unwrap_err();
    assert!(err.to_string().contains("too large"), "{err}");
    // Each edge fits, the area does not.
    assert!(check_layer_size(MAX_LAYER_DIM, MAX_LAYER_DIM).is_err());
    assert!(matches!(
        Surface::new(60_000, 60_000),
        Err(LayerforgeError::Render(_))
    ));
}

#[test]
fn stroke_stays_on_the_edge() {
    let mut s = Surface::new(20, 20).unwrap();
    let outline = stroke_outline_path(Rect::new(0.0, 0.0, 20.0, 20.0), 0.0, 2.0);
    s.stroke_path(&outline, 2.0, Rgba8::opaque(0, 0, 255));
    let raster = s.finish();
    assert_eq!(raster.pixel(10, 10).unwrap()[3], 0);
    assert_eq!(raster.pixel(0, 10).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn zero_width_stroke_is_skipped() {
    let mut s = Surface::new(8, 8).unwrap();
    let path = full(&s);
    s.stroke_path(&path, 0.0, Rgba8::opaque(0, 0, 0));
    s.stroke_path(&path, f64::NAN, Rgba8::opaque(0, 0, 0));
    assert!(s.finish().is_blank());
}

#[test]
fn image_fill_stretches_source_over_surface() {
    let image = PreparedImage {
        width: 2,
        height: 1,
        rgba8_premul: Arc::new(vec![255, 0, 0, 255, 0, 0, 255, 255]),
    };
    let mut s = Surface::new(40, 10).unwrap();
    let path = full(&s);
    s.fill_path_with_image(&path, &image).unwrap();
    let raster = s.finish();

    let left = raster.pixel(2, 5).unwrap();
    let right = raster.pixel(37, 5).unwrap();
    assert_eq!(left[3], 255);
    assert_eq!(right[3], 255);
    assert!(left[0] > left[2]);
    assert!(right[2] > right[0]);
}

#[test]
fn gradient_runs_from_first_to_second_stop() {
    let mut s = Surface::new(100, 4).unwrap();
    let path = full(&s);
    s.fill_path_with_gradient(
        &path,
        (0.0, 0.0),
        (100.0, 0.0),
        [Rgba8::opaque(0, 0, 0), Rgba8::opaque(255, 255, 255)],
    );
    let raster = s.finish();
    let a = raster.pixel(5, 2).unwrap();
    let b = raster.pixel(95, 2).unwrap();
    assert!(a[0] < b[0]);
    assert_eq!(a[3], 255);
}

#[test]
fn alpha_mask_scales_every_channel() {
    let mut raster = LayerRaster {
        width: 2,
        height: 1,
        data: vec![200, 100, 50, 255, 10, 20, 30, 255],
    };
    let mask = LayerRaster {
        width: 2,
        height: 1,
        data: vec![0, 0, 0, 255, 0, 0, 0, 0],
    };
    raster.apply_alpha_mask(&mask).unwrap();
    assert_eq!(raster.pixel(0, 0), Some([200, 100, 50, 255]));
    assert_eq!(raster.pixel(1, 0), Some([0, 0, 0, 0]));

    let mut half = LayerRaster {
        width: 1,
        height: 1,
        data: vec![200, 100, 50, 255],
    };
    half.apply_alpha_mask(&LayerRaster {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 128],
    })
    .unwrap();
    assert_eq!(half.pixel(0, 0), Some([100, 50, 25, 128]));
}

#[test]
fn alpha_mask_size_mismatch_is_an_error() {
    let mut raster = LayerRaster::transparent(2, 2);
    let err = raster
        .apply_alpha_mask(&LayerRaster::transparent(3, 2))
        .unwrap_err();
    assert!(matches!(err, LayerforgeError::Render(_)));
}

#[test]
fn straight_copy_unpremultiplies() {
    let raster = LayerRaster {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
    };
    let straight = raster.to_straight_rgba8();
    assert_eq!(straight[3], 128);
    assert!((i32::from(straight[0]) - 128).abs() <= 1);
    assert_eq!(raster.data, vec![64, 0, 0, 128]);
}
