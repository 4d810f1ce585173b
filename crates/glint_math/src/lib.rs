// Re-export glam for convenience
pub use glam;

/// All geometry runs in double precision: the closeness test below compares
/// points computed on independent code paths against a 1e-8 tolerance,
/// which single precision cannot hold.
pub type Vec3 = glam::DVec3;

mod ray;
pub use ray::Ray;

/// Absolute tolerance for treating two points as the same point.
pub const ATOL: f64 = 1e-8;

/// Whether two points coincide, measured as the sum of absolute
/// per-coordinate differences against [`ATOL`].
#[inline]
pub fn is_close(a: Vec3, b: Vec3) -> bool {
    let d = (a - b).abs();
    d.x + d.y + d.z < ATOL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_is_f64() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        // Survives a perturbation far below f32 resolution at this scale.
        assert!(v.x + 1e-12 > v.x);
    }

    #[test]
    fn test_is_close_accepts_tiny_offsets() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = a + Vec3::new(1e-9, -1e-9, 1e-9);
        assert!(is_close(a, b));
    }

    #[test]
    fn test_is_close_sums_coordinates() {
        // Each coordinate is under the tolerance but the sum is not.
        let a = Vec3::ZERO;
        let b = Vec3::splat(0.4e-8);
        assert!(!is_close(a, b));
    }

    #[test]
    fn test_is_close_rejects_distinct_points() {
        assert!(!is_close(Vec3::ZERO, Vec3::X));
    }
}
