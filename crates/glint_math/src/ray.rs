use crate::Vec3;

/// A ray in 3D space with origin and unit direction.
///
/// Rays represent a half-line starting at `origin` and traveling in
/// `direction`. The direction is normalized on construction, so the
/// parameter of [`Ray::at`] is a distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. `direction` must be nonzero; use [`Ray::from_to`]
    /// when the direction comes from data that could degenerate.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create the ray from one point toward another, or `None` when the
    /// points coincide and no direction exists.
    pub fn from_to(origin: Vec3, target: Vec3) -> Option<Self> {
        let direction = (target - origin).try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Scalar projection of an arbitrary point onto the direction axis,
    /// measured from the origin. Negative means behind the ray.
    #[inline]
    pub fn projection(&self, point: Vec3) -> f64 {
        (point - self.origin).dot(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(ray.direction, Vec3::Y);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_projection_sign() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X);

        assert_eq!(ray.projection(Vec3::new(4.0, 2.0, 0.0)), 3.0);
        assert!(ray.projection(Vec3::new(-1.0, 0.0, 0.0)) < 0.0);
        assert_eq!(ray.projection(ray.origin), 0.0);
    }

    #[test]
    fn test_from_to() {
        let ray = Ray::from_to(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(ray.direction, Vec3::Z);

        // Coincident endpoints have no direction.
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(Ray::from_to(p, p).is_none());
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(Vec3::ZERO, Vec3::Y);
        let ray2 = ray1; // Copy, not move

        assert_eq!(ray1.origin, ray2.origin);
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }
}
