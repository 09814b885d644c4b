pub use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Vec2};
