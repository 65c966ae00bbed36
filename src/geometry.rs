//! Geometry utilities for IDML coordinate handling.
//!
//! IDML geometric bounds are `[top, left, bottom, right]` in points;
//! item transforms are 6-parameter 2D affine matrices `[a, b, c, d, tx, ty]`.
//! All emitted lengths use the target's fixed-point unit (100 units per
//! point), so nothing downstream ever sees a floating-point length.

/// Geometric bounds in IDML order: `[top, left, bottom, right]` (points).
pub type Bounds = [f64; 4];

/// A 2D affine transform: `[a, b, c, d, tx, ty]`.
pub type Transform = [f64; 6];

/// The identity transform.
pub const IDENTITY: Transform = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Fixed-point units per point (1 pt = 1/72 inch, 1 unit = 1/7200 inch).
pub const UNITS_PER_POINT: f64 = 100.0;

/// Tolerance in points when testing page containment.
const PAGE_TOLERANCE: f64 = 0.1;

/// Apply an affine transform to a point.
///
/// ```text
/// | a  c  tx |   | x |   | a*x + c*y + tx |
/// | b  d  ty | * | y | = | b*x + d*y + ty |
/// | 0  0   1 |   | 1 |   |       1        |
/// ```
pub fn apply_transform(t: &Transform, x: f64, y: f64) -> (f64, f64) {
    (t[0] * x + t[2] * y + t[4], t[1] * x + t[3] * y + t[5])
}

/// Combine two affine transforms (parent * child).
///
/// The result applies `child` first, then `parent`.
pub fn combine_transforms(parent: &Transform, child: &Transform) -> Transform {
    let [a1, b1, c1, d1, tx1, ty1] = *parent;
    let [a2, b2, c2, d2, tx2, ty2] = *child;
    [
        a1 * a2 + c1 * b2,
        b1 * a2 + d1 * b2,
        a1 * c2 + c1 * d2,
        b1 * c2 + d1 * d2,
        a1 * tx2 + c1 * ty2 + tx1,
        b1 * tx2 + d1 * ty2 + ty1,
    ]
}

/// Untransformed width of a bounds rectangle (points).
pub fn width(bounds: &Bounds) -> f64 {
    bounds[3] - bounds[1]
}

/// Untransformed height of a bounds rectangle (points).
pub fn height(bounds: &Bounds) -> f64 {
    bounds[2] - bounds[0]
}

/// Axis-aligned bounding box of a bounds rectangle after transformation.
///
/// All four corners are transformed; rotation and shear are not assumed to
/// preserve axis alignment. Returns `[min_x, min_y, max_x, max_y]`.
pub fn transformed_bounding_box(bounds: &Bounds, transform: &Transform) -> [f64; 4] {
    let (top, left, bottom, right) = (bounds[0], bounds[1], bounds[2], bounds[3]);

    let corners = [
        apply_transform(transform, left, top),
        apply_transform(transform, right, top),
        apply_transform(transform, left, bottom),
        apply_transform(transform, right, bottom),
    ];

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in corners {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    [min_x, min_y, max_x, max_y]
}

/// Width of the transformed bounding box (points).
pub fn transformed_width(bounds: &Bounds, transform: &Transform) -> f64 {
    let bbox = transformed_bounding_box(bounds, transform);
    bbox[2] - bbox[0]
}

/// Height of the transformed bounding box (points).
pub fn transformed_height(bounds: &Bounds, transform: &Transform) -> f64 {
    let bbox = transformed_bounding_box(bounds, transform);
    bbox[3] - bbox[1]
}

/// Absolute position of the top-left corner after transformation.
pub fn absolute_top_left(bounds: &Bounds, transform: &Transform) -> (f64, f64) {
    apply_transform(transform, bounds[1], bounds[0])
}

/// Position of a frame relative to a page's top-left corner (points).
pub fn page_relative_position(
    frame_bounds: &Bounds,
    frame_transform: &Transform,
    page_bounds: &Bounds,
    page_transform: &Transform,
) -> (f64, f64) {
    let (fx, fy) = absolute_top_left(frame_bounds, frame_transform);
    let (px, py) = absolute_top_left(page_bounds, page_transform);
    (fx - px, fy - py)
}

/// Extract the rotation angle in degrees from a transform.
///
/// For `[a, b, c, d, tx, ty]` with `a = sx*cos(θ)` and `b = sx*sin(θ)`,
/// the angle is `atan2(b, a)`. Clockwise rotations are positive.
pub fn extract_rotation(transform: &Transform) -> f64 {
    transform[1].atan2(transform[0]).to_degrees()
}

/// Whether a frame's transformed center lies inside a page's transformed
/// area, with a small tolerance so objects on the boundary are kept.
pub fn contains_center(
    frame_bounds: &Bounds,
    frame_transform: &Transform,
    page_bounds: &Bounds,
    page_transform: &Transform,
) -> bool {
    let cx = (frame_bounds[1] + frame_bounds[3]) / 2.0;
    let cy = (frame_bounds[0] + frame_bounds[2]) / 2.0;
    let (cx, cy) = apply_transform(frame_transform, cx, cy);

    let (x1, y1) = apply_transform(page_transform, page_bounds[1], page_bounds[0]);
    let (x2, y2) = apply_transform(page_transform, page_bounds[3], page_bounds[2]);

    let min_x = x1.min(x2) - PAGE_TOLERANCE;
    let max_x = x1.max(x2) + PAGE_TOLERANCE;
    let min_y = y1.min(y2) - PAGE_TOLERANCE;
    let max_y = y1.max(y2) + PAGE_TOLERANCE;

    cx >= min_x && cx <= max_x && cy >= min_y && cy <= max_y
}

/// Convert points to fixed-point units (100 units per point, round half up).
pub fn points_to_units(points: f64) -> i64 {
    (points * UNITS_PER_POINT + 0.5).floor() as i64
}

/// Convert fixed-point units back to points.
pub fn units_to_points(units: i64) -> f64 {
    units as f64 / UNITS_PER_POINT
}

/// Convert millimeters to fixed-point units (1 mm = 7200/25.4 units).
pub fn mm_to_units(mm: f64) -> i64 {
    (mm * 7200.0 / 25.4 + 0.5).floor() as i64
}

/// Convert fixed-point units to millimeters.
pub fn units_to_mm(units: i64) -> f64 {
    units as f64 * 25.4 / 7200.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_identity() {
        let (x, y) = apply_transform(&IDENTITY, 12.5, -3.0);
        assert_eq!((x, y), (12.5, -3.0));
    }

    #[test]
    fn test_apply_translation() {
        let t = [1.0, 0.0, 0.0, 1.0, 10.0, 20.0];
        let (x, y) = apply_transform(&t, 5.0, 5.0);
        assert_eq!((x, y), (15.0, 25.0));
    }

    #[test]
    fn test_combine_transforms() {
        // Scale 2x then translate by (10, 0).
        let scale = [2.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let translate = [1.0, 0.0, 0.0, 1.0, 10.0, 0.0];
        let combined = combine_transforms(&translate, &scale);
        let (x, y) = apply_transform(&combined, 3.0, 4.0);
        assert_eq!((x, y), (16.0, 8.0));
    }

    #[test]
    fn test_rotated_bounding_box() {
        // Local bounds (0,0)-(10,20): width 10, height 20.
        // A 90-degree rotation swaps the extents: width 20, height 10.
        let bounds = [0.0, 0.0, 20.0, 10.0];
        let angle = 90f64.to_radians();
        let rot = [angle.cos(), angle.sin(), -angle.sin(), angle.cos(), 0.0, 0.0];

        let bbox = transformed_bounding_box(&bounds, &rot);
        let w = bbox[2] - bbox[0];
        let h = bbox[3] - bbox[1];
        assert!((w - 20.0).abs() < 1e-9);
        assert!((h - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_extract_rotation() {
        let angle = 30f64.to_radians();
        let rot = [angle.cos(), angle.sin(), -angle.sin(), angle.cos(), 5.0, 7.0];
        assert!((extract_rotation(&rot) - 30.0).abs() < 1e-9);
        assert_eq!(extract_rotation(&IDENTITY), 0.0);
    }

    #[test]
    fn test_page_relative_position() {
        let frame = [100.0, 50.0, 200.0, 150.0];
        let page = [0.0, 0.0, 800.0, 600.0];
        let page_t = [1.0, 0.0, 0.0, 1.0, -300.0, 0.0];
        let (x, y) = page_relative_position(&frame, &IDENTITY, &page, &page_t);
        assert_eq!((x, y), (350.0, 100.0));
    }

    #[test]
    fn test_contains_center() {
        let page = [0.0, 0.0, 792.0, 612.0];
        let inside = [100.0, 100.0, 200.0, 200.0];
        let outside = [100.0, 700.0, 200.0, 900.0];
        assert!(contains_center(&inside, &IDENTITY, &page, &IDENTITY));
        assert!(!contains_center(&outside, &IDENTITY, &page, &IDENTITY));
    }

    #[test]
    fn test_unit_round_trip() {
        for p in 0..=10_000i64 {
            let units = points_to_units(p as f64);
            assert_eq!(units, p * 100);
            assert_eq!(units_to_points(units), p as f64);
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(points_to_units(0.005), 1);
        assert_eq!(points_to_units(0.004), 0);
        // Half up, not half away from zero.
        assert_eq!(points_to_units(-0.005), 0);
    }

    #[test]
    fn test_mm_conversion() {
        assert_eq!(mm_to_units(25.4), 7200);
        assert!((units_to_mm(7200) - 25.4).abs() < 1e-9);
    }
}
