//! Scene description for the glint ray tracer.
//!
//! This module defines the entities a scene file describes: camera, render
//! settings, materials, lights, and the three shape primitives. It stays
//! renderer-agnostic; the intersection and shading math lives in
//! `glint_render`.

use glint_math::Vec3;
use thiserror::Error;

mod parse;
pub use parse::{load_scene, parse_scene, ParseError, ParseResult};

/// The viewer: position, orientation, and the screen plane rays pass
/// through.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,

    /// Point the camera looks toward
    pub look_at: Vec3,

    /// Requested up direction; made orthogonal to the view axis when the
    /// render basis is built, so it only needs to be non-parallel
    pub up: Vec3,

    /// Distance from the eye to the screen plane
    pub screen_distance: f64,

    /// World-space width of the screen plane; the height follows from the
    /// output aspect ratio
    pub screen_width: f64,
}

/// Global render parameters carried by the scene file.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Color returned by rays that leave the scene (RGB, 0-1)
    pub background: Vec3,

    /// Side of the soft-shadow sample grid; the sampler casts grid² rays
    pub shadow_grid_size: u32,

    /// Reflection recursion budget for the shading engine
    pub max_recursion_depth: u32,
}

/// Surface appearance. Shapes reference materials by 1-based index.
#[derive(Clone, Debug)]
pub struct Material {
    /// Diffuse color (RGB, 0-1)
    pub diffuse: Vec3,

    /// Specular color (RGB, 0-1)
    pub specular: Vec3,

    /// Mirror reflection color; zero disables the mirror term
    pub reflect: Vec3,

    /// Phong exponent for the specular highlight
    pub phong: f64,

    /// 0 = opaque, 1 = fully transparent
    pub transparency: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec3::splat(0.5), // Grey default
            specular: Vec3::ZERO,
            reflect: Vec3::ZERO,
            phong: 1.0,
            transparency: 0.0,
        }
    }
}

/// A point light with an area extent for soft shadows.
#[derive(Clone, Debug)]
pub struct Light {
    /// Light position
    pub position: Vec3,

    /// Light color (RGB, 0-1)
    pub rgb: Vec3,

    /// Scale applied to the specular term of this light
    pub specular_intensity: f64,

    /// How strongly occlusion darkens this light, 0-1; 0 disables shadow
    /// sampling entirely
    pub shadow_intensity: f64,

    /// Side of the square the soft-shadow sampler spans around the
    /// position
    pub radius: f64,
}

/// A sphere given by center and radius.
#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    /// 1-based material index
    pub material: usize,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// An infinite plane satisfying `dot(normal, p) = offset`.
#[derive(Clone, Debug)]
pub struct Plane {
    /// Unit normal (normalized on construction; zero stays zero and is
    /// rejected by [`Scene::validate`])
    pub normal: Vec3,
    pub offset: f64,
    /// 1-based material index
    pub material: usize,
}

impl Plane {
    /// Create a plane. The normal is normalized; the offset is kept as
    /// given, so it is measured against the unit normal.
    pub fn new(normal: Vec3, offset: f64, material: usize) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            offset,
            material,
        }
    }
}

/// An axis-aligned box with equal sides (`box` in scene files).
#[derive(Clone, Debug)]
pub struct Cube {
    pub center: Vec3,
    pub length: f64,
    /// Smallest corner, precomputed for the slab intersection test
    pub min: Vec3,
    /// Largest corner
    pub max: Vec3,
    /// 1-based material index
    pub material: usize,
}

impl Cube {
    pub fn new(center: Vec3, length: f64, material: usize) -> Self {
        let half = Vec3::splat(length / 2.0);
        Self {
            center,
            length,
            min: center - half,
            max: center + half,
            material,
        }
    }
}

/// The closed set of shape primitives.
///
/// Adding a primitive means a new variant plus arms in the intersection
/// dispatch; there is no open trait registry by design of the format.
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Cube(Cube),
}

impl Shape {
    /// The 1-based material index this shape references.
    pub fn material_index(&self) -> usize {
        match self {
            Shape::Sphere(s) => s.material,
            Shape::Plane(p) => p.material,
            Shape::Cube(c) => c.material,
        }
    }

    /// Name used in diagnostics; matches the scene-file code vocabulary.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Sphere(_) => "sphere",
            Shape::Plane(_) => "plane",
            Shape::Cube(_) => "box",
        }
    }
}

/// Scene data failing a precondition the renderer relies on.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("{kind} {index} references material {material}, but the scene defines {count} (indices are 1-based)")]
    BadMaterial {
        kind: &'static str,
        index: usize,
        material: usize,
        count: usize,
    },

    #[error("plane {index} has a zero-length normal")]
    ZeroNormal { index: usize },

    #[error("sphere {index} has non-positive radius {radius}")]
    BadRadius { index: usize, radius: f64 },

    #[error("box {index} has non-positive side length {length}")]
    BadLength { index: usize, length: f64 },

    #[error("shadow grid size must be at least 1")]
    ZeroShadowGrid,
}

/// A complete scene: one camera, one settings block, and the ordered
/// entity lists. Shape order is meaningful: the index identifies a shape
/// for exclusion from secondary rays.
#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub settings: RenderSettings,
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Create a scene with no materials, lights, or shapes yet.
    pub fn new(camera: Camera, settings: RenderSettings) -> Self {
        Self {
            camera,
            settings,
            materials: Vec::new(),
            lights: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Add a material and return its 1-based index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len()
    }

    /// Add a light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add a shape and return its index in the shape list.
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// The material a shape references.
    ///
    /// Indexes directly; only valid for scenes that passed
    /// [`Scene::validate`].
    pub fn material_of(&self, shape: &Shape) -> &Material {
        &self.materials[shape.material_index() - 1]
    }

    /// Get shape count.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Get light count.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Check every precondition the render path indexes or divides by,
    /// so rendering itself never has to.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.settings.shadow_grid_size == 0 {
            return Err(SceneError::ZeroShadowGrid);
        }

        let count = self.materials.len();
        for (index, shape) in self.shapes.iter().enumerate() {
            let material = shape.material_index();
            if material == 0 || material > count {
                return Err(SceneError::BadMaterial {
                    kind: shape.kind(),
                    index,
                    material,
                    count,
                });
            }

            match shape {
                Shape::Sphere(s) if s.radius <= 0.0 => {
                    return Err(SceneError::BadRadius {
                        index,
                        radius: s.radius,
                    });
                }
                Shape::Plane(p) if p.normal == Vec3::ZERO => {
                    return Err(SceneError::ZeroNormal { index });
                }
                Shape::Cube(c) if c.length <= 0.0 => {
                    return Err(SceneError::BadLength {
                        index,
                        length: c.length,
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scene() -> Scene {
        Scene::new(
            Camera {
                position: Vec3::ZERO,
                look_at: Vec3::X,
                up: Vec3::Y,
                screen_distance: 1.0,
                screen_width: 2.0,
            },
            RenderSettings {
                background: Vec3::ZERO,
                shadow_grid_size: 1,
                max_recursion_depth: 3,
            },
        )
    }

    #[test]
    fn test_material_lookup_is_one_based() {
        let mut scene = test_scene();
        let first = scene.add_material(Material {
            diffuse: Vec3::X,
            ..Default::default()
        });
        let second = scene.add_material(Material {
            diffuse: Vec3::Y,
            ..Default::default()
        });
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0, second)));
        let material = scene.material_of(&scene.shapes[0]);
        assert_eq!(material.diffuse, Vec3::Y);
    }

    #[test]
    fn test_validate_accepts_well_formed_scene() {
        let mut scene = test_scene();
        let m = scene.add_material(Material::default());
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::X, 1.0, m)));
        scene.add_shape(Shape::Plane(Plane::new(Vec3::Y, -1.0, m)));
        scene.add_shape(Shape::Cube(Cube::new(Vec3::Z, 2.0, m)));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_material_reference() {
        let mut scene = test_scene();
        scene.add_material(Material::default());

        // Index 0 is invalid under 1-based addressing.
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0, 0)));
        assert!(matches!(
            scene.validate(),
            Err(SceneError::BadMaterial { material: 0, .. })
        ));

        scene.shapes.clear();
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0, 2)));
        assert!(matches!(
            scene.validate(),
            Err(SceneError::BadMaterial { material: 2, count: 1, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_shadow_grid() {
        let mut scene = test_scene();
        scene.settings.shadow_grid_size = 0;
        assert!(matches!(scene.validate(), Err(SceneError::ZeroShadowGrid)));
    }

    #[test]
    fn test_validate_rejects_degenerate_sizes() {
        let mut scene = test_scene();
        let m = scene.add_material(Material::default());
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::ZERO, 0.0, m)));
        assert!(matches!(
            scene.validate(),
            Err(SceneError::BadRadius { index: 0, .. })
        ));

        scene.shapes.clear();
        scene.add_shape(Shape::Cube(Cube::new(Vec3::ZERO, -1.0, m)));
        assert!(matches!(
            scene.validate(),
            Err(SceneError::BadLength { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_plane_normal() {
        let mut scene = test_scene();
        let m = scene.add_material(Material::default());
        scene.add_shape(Shape::Plane(Plane::new(Vec3::ZERO, 1.0, m)));
        assert!(matches!(
            scene.validate(),
            Err(SceneError::ZeroNormal { index: 0 })
        ));
    }

    #[test]
    fn test_plane_normal_normalized_on_construction() {
        let plane = Plane::new(Vec3::new(0.0, 3.0, 0.0), 2.0, 1);
        assert_eq!(plane.normal, Vec3::Y);
        assert_eq!(plane.offset, 2.0);
    }

    #[test]
    fn test_cube_corners() {
        let cube = Cube::new(Vec3::new(3.0, 3.0, 0.0), 2.0, 1);
        assert_eq!(cube.min, Vec3::new(2.0, 2.0, -1.0));
        assert_eq!(cube.max, Vec3::new(4.0, 4.0, 1.0));
    }
}
