//! Stratified soft-shadow sampling.
//!
//! Each area light is modeled as a square of side `radius` centered on
//! the light position and facing the shaded point. The square is cut
//! into an N x N grid, one jittered sample is cast per cell, and the
//! returned visibility is the fraction of samples whose first obstacle
//! is the shaded point itself.

use glint_math::{is_close, Ray, Vec3};
use glint_scene::Scene;
use rand::{Rng, RngCore};

use crate::intersect::{nearest_hit, ShapeSet};

/// Two unit axes spanning the plane perpendicular to `direction`.
///
/// The seed axis only has to be non-parallel to `direction`; the world X
/// axis works unless the direction is mostly X, in which case Y does.
fn perpendicular_axes(direction: Vec3) -> (Vec3, Vec3) {
    let seed = if direction.x.abs() < 0.9 {
        Vec3::X
    } else {
        Vec3::Y
    };
    let u = (seed - direction * seed.dot(direction)).normalize();
    let v = direction.cross(u);
    (u, v)
}

/// Fraction of the light square that reaches `target`, in `[0, 1]`.
///
/// `light_ray` is the ray from the light center to the target; its
/// direction orients the square. Sampling consumes `grid`^2 values from
/// `rng` in row-major cell order, so a seeded generator reproduces the
/// same pattern exactly.
pub(crate) fn visibility(
    light_ray: &Ray,
    target: Vec3,
    radius: f64,
    grid: u32,
    scene: &Scene,
    shapes: &ShapeSet,
    rng: &mut dyn RngCore,
) -> f64 {
    let (u, v) = perpendicular_axes(light_ray.direction);
    let cell = radius / grid as f64;
    let corner = light_ray.origin - (u + v) * (radius / 2.0);

    let mut reached: u64 = 0;
    for i in 0..grid {
        for j in 0..grid {
            let du = (i as f64 + rng.gen::<f64>()) * cell;
            let dv = (j as f64 + rng.gen::<f64>()) * cell;
            let sample = corner + u * du + v * dv;

            // A sample landing on the target itself counts as blocked.
            let Some(ray) = Ray::from_to(sample, target) else {
                continue;
            };
            if let Some(hit) = nearest_hit(&ray, scene, shapes) {
                if is_close(hit.point, target) {
                    reached += 1;
                }
            }
        }
    }
    reached as f64 / (grid as f64 * grid as f64)
}
