use crate::foundation::core::{Affine, Point, Vec2};

/// Components of an affine matrix: translation, rotation, non-uniform
/// scale, horizontal shear. Recomposition order is rotate, scale, shear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    pub translate: Vec2,
    pub rotation_rad: f64,
    pub scale: Vec2,
    pub skew_x_rad: f64,
}

/// QR-style decomposition of an affine matrix (no perspective).
pub fn qr_decompose(m: Affine) -> Decomposed {
    let [a, b, c, d, e, f] = m.as_coeffs();
    let rotation_rad = b.atan2(a);
    let denom = a * a + b * b;
    let scale_x = denom.sqrt();
    let scale_y = if scale_x == 0.0 {
        0.0
    } else {
        (a * d - c * b) / scale_x
    };
    let skew_x_rad = (a * c + b * d).atan2(denom);
    Decomposed {
        translate: Vec2::new(e, f),
        rotation_rad,
        scale: Vec2::new(scale_x, scale_y),
        skew_x_rad,
    }
}

/// Rebuild the linear part from decomposed components.
pub fn recompose_linear(d: &Decomposed) -> Affine {
    Affine::rotate(d.rotation_rad)
        * Affine::scale_non_uniform(d.scale.x, d.scale.y)
        * Affine::new([1.0, 0.0, d.skew_x_rad.tan(), 1.0, 0.0, 0.0])
}

/// Apply `skew` to an object placed at `origin` with extents
/// `width`/`height`, preserving the object's visual center.
///
/// The object's current world transform (its center translation) is
/// composed with the skew, the product is decomposed, and the object is
/// re-anchored at the decomposed translation using center origin. The
/// recenter step is load-bearing: the skew pivots around the canvas
/// origin, so composing without it shifts the object's apparent position.
///
/// The returned affine maps the object's local top-left coordinate space
/// onto the canvas.
pub fn skew_about_center(origin: Point, width: f64, height: f64, skew: Affine) -> Affine {
    let center = Vec2::new(origin.x + width / 2.0, origin.y + height / 2.0);
    let current = Affine::translate(center);
    let composed = current * skew;
    let parts = qr_decompose(composed);

    Affine::translate(parts.translate)
        * recompose_linear(&parts)
        * Affine::translate(Vec2::new(-width / 2.0, -height / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKEW: [f64; 6] = [1.0, 0.0, -0.4, 1.0, 0.0, 0.0];

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    #[test]
    fn decompose_recovers_pure_shear() {
        let d = qr_decompose(Affine::new(SKEW));
        assert_close(d.rotation_rad, 0.0);
        assert_close(d.scale.x, 1.0);
        assert_close(d.scale.y, 1.0);
        assert_close(d.skew_x_rad.tan(), -0.4);
    }

    #[test]
    fn recompose_roundtrips_rotate_scale_shear() {
        let m = Affine::rotate(0.3)
            * Affine::scale_non_uniform(2.0, 0.5)
            * Affine::new([1.0, 0.0, 0.25, 1.0, 0.0, 0.0]);
        let d = qr_decompose(m);
        let r = recompose_linear(&d);
        for (x, y) in [(1.0, 0.0), (0.0, 1.0), (3.0, -2.0)] {
            let p = kurbo::Point::new(x, y);
            let a = m * p;
            let b = r * p;
            assert_close(a.x, b.x);
            assert_close(a.y, b.y);
        }
    }

    #[test]
    fn skew_preserves_visual_center() {
        let origin = Point::new(170.0, 200.0);
        let (w, h) = (640.0, 232.0);
        let t = skew_about_center(origin, w, h, Affine::new(SKEW));

        let local_center = Point::new(w / 2.0, h / 2.0);
        let mapped = t * local_center;
        assert_close(mapped.x, origin.x + w / 2.0);
        assert_close(mapped.y, origin.y + h / 2.0);
    }

    #[test]
    fn identity_skew_degenerates_to_placement() {
        let origin = Point::new(10.0, 20.0);
        let t = skew_about_center(origin, 100.0, 50.0, Affine::IDENTITY);
        let mapped = t * Point::new(0.0, 0.0);
        assert_close(mapped.x, 10.0);
        assert_close(mapped.y, 20.0);
    }

    #[test]
    fn skewed_corner_moves_but_center_does_not() {
        let origin = Point::new(0.0, 0.0);
        let (w, h) = (200.0, 100.0);
        let t = skew_about_center(origin, w, h, Affine::new(SKEW));

        let top_left = t * Point::new(0.0, 0.0);
        // Above-center rows shear right under a negative-c skew about center.
        assert!(top_left.x > 0.0);
        assert_close(top_left.y, 0.0);
    }
}
