//! Ray-shape intersection tests and the scene-wide nearest-hit scan.
//!
//! Every shape answers two questions through [`Surface`]: where does a ray
//! first meet it, and what is the outward normal at a surface point. The
//! per-shape tests may report points behind the ray origin (the plane and
//! box tests solve for a line, not a half-line); [`nearest_hit`] applies
//! the front-of-ray filter once, for all of them.

use glint_math::{Ray, Vec3};
use glint_scene::{Cube, Plane, Scene, Shape, Sphere};

/// Absolute tolerance under which a near-graze counts as touching a
/// sphere; the tangent point is then reported instead of a chord root.
pub const SPHERE_TANGENT_ATOL: f64 = 0.01;

/// Rays closer than this to parallel with a plane never hit it.
pub const PLANE_PARALLEL_ATOL: f64 = 0.01;

/// Intersection capability implemented by every shape variant.
pub trait Surface {
    /// The first point where `ray`'s line meets this surface, if any.
    fn intersect(&self, ray: &Ray) -> Option<Vec3>;

    /// Outward unit normal for a point on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        // Project the center onto the ray; a non-positive parameter puts
        // the whole sphere behind the origin.
        let along = ray.projection(self.center);
        if along <= 0.0 {
            return None;
        }

        let closest = ray.at(along);
        let offset = closest.distance(self.center);
        if offset > self.radius {
            return None;
        }
        if (self.radius - offset).abs() < SPHERE_TANGENT_ATOL {
            // Grazing ray: the closest approach is the touch point.
            return Some(closest);
        }

        let half_chord = (self.radius * self.radius - offset * offset).sqrt();
        Some(ray.at(along - half_chord))
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }
}

impl Surface for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let along = self.normal.dot(ray.direction);
        if along.abs() < PLANE_PARALLEL_ATOL {
            return None;
        }
        let t = (self.offset - self.normal.dot(ray.origin)) / along;
        Some(ray.at(t))
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}

impl Surface for Cube {
    fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        // Slab test over the precomputed corners. A zero direction
        // component yields ±inf slab bounds, which the component-wise
        // min/max filter out.
        let inv = ray.direction.recip();
        let near = (self.min - ray.origin) * inv;
        let far = (self.max - ray.origin) * inv;

        let entry = near.min(far).max_element();
        let exit = near.max(far).min_element();
        if exit < entry {
            return None;
        }
        Some(ray.at(entry))
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        // The face the point lies on is the one whose plane is nearest;
        // distance selection absorbs the rounding the slab entry carries.
        let mut best = f64::INFINITY;
        let mut normal = Vec3::X;
        for (axis, unit) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().enumerate() {
            let to_min = (point[axis] - self.min[axis]).abs();
            if to_min < best {
                best = to_min;
                normal = -unit;
            }
            let to_max = (point[axis] - self.max[axis]).abs();
            if to_max < best {
                best = to_max;
                normal = unit;
            }
        }
        normal
    }
}

impl Surface for Shape {
    fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
            Shape::Cube(c) => c.intersect(ray),
        }
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(p) => p.normal_at(point),
            Shape::Cube(c) => c.normal_at(point),
        }
    }
}

/// A surface point found by [`nearest_hit`], tagged with the index of the
/// shape it lies on. The index is what secondary rays exclude; comparing
/// points cannot distinguish two surfaces meeting at one point.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub point: Vec3,
    pub shape: usize,
}

/// Membership mask over the scene's shape list.
///
/// Secondary rays never re-hit the surface they start on: they carry a
/// copy of this set with that shape removed instead of relying on an
/// epsilon offset along the ray.
#[derive(Clone, Debug)]
pub struct ShapeSet {
    live: Vec<bool>,
}

impl ShapeSet {
    /// The set containing every shape of a scene with `count` shapes.
    pub fn all(count: usize) -> Self {
        Self {
            live: vec![true; count],
        }
    }

    /// A copy of this set with one shape removed.
    pub fn without(&self, index: usize) -> Self {
        let mut set = self.clone();
        set.live[index] = false;
        set
    }

    /// Whether the shape at `index` is still a candidate.
    pub fn contains(&self, index: usize) -> bool {
        self.live[index]
    }
}

/// Scan the candidate shapes and return the hit nearest to the ray
/// origin, ignoring points behind it.
pub fn nearest_hit(ray: &Ray, scene: &Scene, shapes: &ShapeSet) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    let mut nearest_dist = f64::INFINITY;

    for (index, shape) in scene.shapes.iter().enumerate() {
        if !shapes.contains(index) {
            continue;
        }
        let Some(point) = shape.intersect(ray) else {
            continue;
        };
        if ray.projection(point) < 0.0 {
            continue;
        }
        let dist = point.distance_squared(ray.origin);
        if dist < nearest_dist {
            nearest_dist = dist;
            nearest = Some(Hit {
                point,
                shape: index,
            });
        }
    }

    nearest
}
