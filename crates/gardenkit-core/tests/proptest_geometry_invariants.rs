//! Property-based invariant tests for geometry primitives.
//!
//! 1. `clamp_unit` always lands in `[0, 1]`.
//! 2. Points inside a non-empty rect map to fractions in `[0, 1)`.
//! 3. `relative_fraction` is the inverse of scaling a fraction onto the rect.
//! 4. Grid area matches width * height without overflow.

use gardenkit_core::geometry::{GridSize, Point, Rect, clamp_unit};
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (
        -1_000.0f64..1_000.0,
        -1_000.0f64..1_000.0,
        1.0f64..2_000.0,
        1.0f64..2_000.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn clamp_unit_is_bounded(v in any::<f64>()) {
        let c = clamp_unit(v);
        prop_assert!((0.0..=1.0).contains(&c), "clamp_unit({}) = {}", v, c);
    }
}

proptest! {
    #[test]
    fn inside_points_have_unit_fractions(
        rect in rect_strategy(),
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let p = Point::new(rect.x + fx * rect.width, rect.y + fy * rect.height);
        let (rx, ry) = rect.relative_fraction(p).unwrap();
        prop_assert!((rx - fx).abs() < 1e-9, "x fraction drifted: {} vs {}", rx, fx);
        prop_assert!((ry - fy).abs() < 1e-9, "y fraction drifted: {} vs {}", ry, fy);
    }
}

proptest! {
    #[test]
    fn grid_area_is_product(w in any::<u32>(), h in any::<u32>()) {
        prop_assert_eq!(GridSize::new(w, h).area(), w as u64 * h as u64);
    }
}
