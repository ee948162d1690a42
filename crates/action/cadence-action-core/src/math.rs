//! Small vector helpers over plain `[f32; 3]` points.
//! All numeric types use f32, matching the target contract.

use serde::{Deserialize, Serialize};

/// Position / delta in scene units (x, y, z).
pub type Vec3 = [f32; 3];

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    add(a, scale(sub(b, a), t))
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn is_finite(v: Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Cubic Bézier path with control points relative to the start position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BezierPath {
    pub p0: Vec3,
    pub c1: Vec3,
    pub c2: Vec3,
    pub p1: Vec3,
}

impl BezierPath {
    /// Curve from the origin to `end` with the given control points.
    pub fn new(c1: Vec3, c2: Vec3, end: Vec3) -> Self {
        Self {
            p0: [0.0; 3],
            c1,
            c2,
            p1: end,
        }
    }

    /// Evaluate the curve at `t` in [0, 1].
    pub fn at(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        let mut out = [0.0; 3];
        for (i, c) in out.iter_mut().enumerate() {
            *c = b0 * self.p0[i] + b1 * self.c1[i] + b2 * self.c2[i] + b3 * self.p1[i];
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        is_finite(self.p0) && is_finite(self.c1) && is_finite(self.c2) && is_finite(self.p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_hits_its_endpoints() {
        let path = BezierPath::new([0.0, 50.0, 0.0], [100.0, 50.0, 0.0], [100.0, 0.0, 0.0]);
        assert_eq!(path.at(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(path.at(1.0), [100.0, 0.0, 0.0]);
        let mid = path.at(0.5);
        assert!((mid[0] - 50.0).abs() < 1e-4);
        assert!((mid[1] - 37.5).abs() < 1e-4);
    }

    #[test]
    fn lerp_endpoints() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 2.0, 1.0];
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), [2.0, 2.0, 2.0]);
    }
}
