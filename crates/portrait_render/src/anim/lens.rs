//! Magnetic lens around the pointer.

use super::Point;

/// Distance beyond which cells ignore the pointer.
pub const LENS_RADIUS: f64 = 200.0;
const MAX_SCALE_GAIN: f64 = 0.35;
const WAVE_STRENGTH: f64 = 8.0;
const HOVER_ALPHA_FLOOR: f64 = 0.8;
const HOVER_ALPHA_GAIN: f64 = 0.2;

/// Cubic ease `3t² - 2t³`.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LensDistortion {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Lowest opacity the cell may be drawn with while under the lens.
    pub min_alpha: f64,
}

/// Eased lens intensity for a cell at `distance` from the pointer.
pub fn intensity(distance: f64) -> f64 {
    if distance >= LENS_RADIUS {
        return 0.0;
    }
    smoothstep(1.0 - distance / LENS_RADIUS)
}

/// Distortion applied to the cell centred at `cell`, or `None` outside the radius.
pub fn distort(cell: Point, pointer: Point) -> Option<LensDistortion> {
    let dx = pointer.x - cell.x;
    let dy = pointer.y - cell.y;
    let distance = dx.hypot(dy);
    if distance >= LENS_RADIUS {
        return None;
    }

    let eased = intensity(distance);
    let angle = dy.atan2(dx);
    let wave = eased * WAVE_STRENGTH;

    Some(LensDistortion {
        scale: 1.0 + eased * MAX_SCALE_GAIN,
        offset_x: -angle.cos() * wave,
        offset_y: -angle.sin() * wave,
        min_alpha: HOVER_ALPHA_FLOOR + eased * HOVER_ALPHA_GAIN,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn smoothstep_endpoints_and_monotonicity() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5_000 {
            let a: f64 = rng.gen_range(0.0..=1.0);
            let b: f64 = rng.gen_range(0.0..=1.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            assert!(smoothstep(lo) <= smoothstep(hi), "{lo} {hi}");
        }
    }

    #[test]
    fn full_strength_at_the_pointer() {
        let point = Point::new(50.0, 50.0);
        let lens = distort(point, point).unwrap();
        assert_eq!(lens.scale, 1.35);
        assert_eq!(lens.min_alpha, 1.0);
        let magnitude = lens.offset_x.hypot(lens.offset_y);
        assert!((magnitude - WAVE_STRENGTH).abs() < 1e-12);
    }

    #[test]
    fn no_effect_at_or_beyond_radius() {
        let cell = Point::new(0.0, 0.0);
        assert_eq!(intensity(LENS_RADIUS), 0.0);
        assert!(distort(cell, Point::new(LENS_RADIUS, 0.0)).is_none());
        assert!(distort(cell, Point::new(300.0, 400.0)).is_none());
    }

    #[test]
    fn cells_are_pushed_away_from_the_pointer() {
        let pointer = Point::new(100.0, 100.0);

        let right = distort(Point::new(150.0, 100.0), pointer).unwrap();
        assert!(right.offset_x > 0.0);
        assert!(right.offset_y.abs() < 1e-9);

        let above = distort(Point::new(100.0, 40.0), pointer).unwrap();
        assert!(above.offset_y < 0.0);
        assert!(above.offset_x.abs() < 1e-9);
    }

    #[test]
    fn distortion_weakens_with_distance() {
        let pointer = Point::new(0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            let near: f64 = rng.gen_range(0.0..LENS_RADIUS);
            let far: f64 = rng.gen_range(near..LENS_RADIUS);
            let near = distort(Point::new(near, 0.0), pointer).unwrap();
            let Some(far) = distort(Point::new(far, 0.0), pointer) else { continue };
            assert!(far.scale <= near.scale);
            assert!(far.min_alpha <= near.min_alpha);
            assert!((1.0..=1.35).contains(&far.scale));
            assert!((0.8..=1.0).contains(&far.min_alpha));
        }
    }
}
