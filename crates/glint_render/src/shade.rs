//! Recursive Whitted shading.
//!
//! Two mutually recursive functions: [`trace`] finds the nearest surface
//! and `shade` lights it. Termination needs no global state: the mirror
//! branch decrements the depth budget and the transparency branch strictly
//! shrinks the candidate shape set, so the recursion is bounded by
//! depth × shape count.

use glint_math::{is_close, Ray, Vec3};
use glint_scene::Scene;
use rand::RngCore;

use crate::intersect::{nearest_hit, Hit, ShapeSet, Surface};
use crate::shadow;
use crate::{Color, RenderError, RenderOptions, RenderResult, ShadowPolicy};

/// Reflect `v` about the unit normal `n`.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// What a ray sees: the shaded color of the nearest candidate surface, or
/// `None` when the budget is exhausted or nothing is hit (the caller
/// substitutes the background or skips the term).
pub(crate) fn trace(
    ray: &Ray,
    scene: &Scene,
    options: &RenderOptions,
    shapes: &ShapeSet,
    depth: u32,
    rng: &mut dyn RngCore,
) -> RenderResult<Option<Color>> {
    if depth == 0 {
        return Ok(None);
    }
    match nearest_hit(ray, scene, shapes) {
        Some(hit) => shade(&hit, ray, scene, options, shapes, depth, rng).map(Some),
        None => Ok(None),
    }
}

fn shade(
    hit: &Hit,
    ray: &Ray,
    scene: &Scene,
    options: &RenderOptions,
    shapes: &ShapeSet,
    depth: u32,
    rng: &mut dyn RngCore,
) -> RenderResult<Color> {
    let shape = &scene.shapes[hit.shape];
    let material = scene.material_of(shape);
    let normal = shape.normal_at(hit.point);

    // What the same ray sees with this shape removed. It does not depend
    // on the light, so it is computed once and blended per light below.
    // Same depth: transparency rides on the shrinking shape set instead
    // of the mirror budget.
    let behind = if material.transparency > 0.0 {
        Some(trace(
            ray,
            scene,
            options,
            &shapes.without(hit.shape),
            depth,
            rng,
        )?)
    } else {
        None
    };

    let mut color = Color::ZERO;
    for light in &scene.lights {
        let light_ray = Ray::from_to(light.position, hit.point)
            .ok_or(RenderError::LightOnSurface(light.position))?;

        // Occlusion gate: cast from the light and see what it reaches
        // first. A light whose ray hits nothing contributes nothing.
        match nearest_hit(&light_ray, scene, shapes) {
            None => continue,
            Some(first) => {
                if !is_close(first.point, hit.point)
                    && options.shadow_policy == ShadowPolicy::Skip
                {
                    continue;
                }
            }
        }

        let diffuse = material.diffuse * normal.dot(-light_ray.direction).abs();
        let mirror_of_light = reflect(light_ray.direction, normal);
        let specular = material.specular
            * mirror_of_light.dot(-ray.direction).abs().powf(material.phong)
            * light.specular_intensity;

        let intensity = if light.shadow_intensity > 0.0 {
            let visible = shadow::visibility(
                &light_ray,
                hit.point,
                light.radius,
                scene.settings.shadow_grid_size,
                scene,
                shapes,
                rng,
            );
            (1.0 - light.shadow_intensity) + light.shadow_intensity * visible
        } else {
            1.0
        };

        let direct = light.rgb * (diffuse + specular) * intensity;
        color += match &behind {
            None => direct,
            Some(seen) => {
                // The light tints what shines through a surface, but the
                // bare background is used as-is.
                let transmitted = match seen {
                    Some(surface) => *surface * light.rgb,
                    None => scene.settings.background,
                };
                direct * (1.0 - material.transparency) + transmitted * material.transparency
            }
        };
    }

    // Mirror term, paid for out of the depth budget.
    let bounce = Ray::new(hit.point, reflect(ray.direction, normal));
    if let Some(reflected) = trace(
        &bounce,
        scene,
        options,
        &shapes.without(hit.shape),
        depth - 1,
        rng,
    )? {
        color += material.reflect * reflected;
    }

    Ok(color.min(Color::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_scene::{Camera, Light, Material, RenderSettings, Shape, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn empty_scene(background: Vec3) -> Scene {
        Scene::new(
            Camera {
                position: Vec3::ZERO,
                look_at: Vec3::X,
                up: Vec3::Y,
                screen_distance: 1.0,
                screen_width: 2.0,
            },
            RenderSettings {
                background,
                shadow_grid_size: 1,
                max_recursion_depth: 5,
            },
        )
    }

    fn white_light_at(position: Vec3) -> Light {
        Light {
            position,
            rgb: Vec3::ONE,
            specular_intensity: 0.0,
            shadow_intensity: 0.0,
            radius: 1.0,
        }
    }

    fn run_trace(scene: &Scene, ray: &Ray, depth: u32) -> RenderResult<Option<Color>> {
        let options = RenderOptions::default();
        let shapes = ShapeSet::all(scene.shape_count());
        let mut rng = StdRng::seed_from_u64(42);
        trace(ray, scene, &options, &shapes, depth, &mut rng)
    }

    #[test]
    fn test_miss_reports_nothing_seen() {
        let scene = empty_scene(Vec3::new(0.1, 0.2, 0.3));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(run_trace(&scene, &ray, 5).unwrap().is_none());
    }

    #[test]
    fn test_exhausted_budget_reports_nothing_seen() {
        let mut scene = empty_scene(Vec3::ZERO);
        let m = scene.add_material(Material::default());
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, m)));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(run_trace(&scene, &ray, 0).unwrap().is_none());
    }

    #[test]
    fn test_head_on_diffuse_term() {
        let mut scene = empty_scene(Vec3::ZERO);
        let m = scene.add_material(Material {
            diffuse: Vec3::new(1.0, 0.0, 0.0),
            ..Default::default()
        });
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, m)));
        // Light at the eye: its ray retraces the camera ray, so the lit
        // point is exactly the visible point and |dot| is 1.
        scene.add_light(white_light_at(Vec3::ZERO));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let color = run_trace(&scene, &ray, 5).unwrap().unwrap();
        assert!((color - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_occluder_respects_shadow_policy() {
        let mut scene = empty_scene(Vec3::ZERO);
        let m = scene.add_material(Material {
            diffuse: Vec3::ONE,
            ..Default::default()
        });
        // Viewed sphere, seen from +X looking back toward the origin.
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, m)));
        // Small sphere between the light at the origin and the far face.
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.5, m)));
        scene.add_light(white_light_at(Vec3::ZERO));

        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), -Vec3::X);
        let shapes = ShapeSet::all(scene.shape_count());
        let mut rng = StdRng::seed_from_u64(42);

        let skip = RenderOptions {
            shadow_policy: ShadowPolicy::Skip,
            ..Default::default()
        };
        let color = trace(&ray, &scene, &skip, &shapes, 5, &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(color, Vec3::ZERO);

        // Attenuation leaves the light to the soft factor, which is 1
        // here because shadow_intensity is 0.
        let attenuate = RenderOptions {
            shadow_policy: ShadowPolicy::Attenuate,
            ..Default::default()
        };
        let color = trace(&ray, &scene, &attenuate, &shapes, 5, &mut rng)
            .unwrap()
            .unwrap();
        assert!((color - Vec3::ONE).length() < 1e-12);
    }

    #[test]
    fn test_transparency_blends_background_through_surface() {
        use glint_scene::Plane;

        let mut scene = empty_scene(Vec3::new(0.0, 0.0, 1.0));
        let m = scene.add_material(Material {
            diffuse: Vec3::new(0.4, 0.0, 0.0),
            transparency: 0.5,
            ..Default::default()
        });
        scene.add_shape(Shape::Plane(Plane::new(Vec3::X, 3.0, m)));
        scene.add_light(white_light_at(Vec3::ZERO));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let color = run_trace(&scene, &ray, 5).unwrap().unwrap();
        // Half the direct red, half the untinted background blue.
        assert!((color - Vec3::new(0.2, 0.0, 0.5)).length() < 1e-12);
    }

    #[test]
    fn test_transparent_chain_survives_a_depth_one_budget() {
        use glint_scene::Plane;

        let mut scene = empty_scene(Vec3::new(0.0, 0.0, 1.0));
        let red = scene.add_material(Material {
            diffuse: Vec3::new(0.4, 0.0, 0.0),
            transparency: 0.5,
            ..Default::default()
        });
        let green = scene.add_material(Material {
            diffuse: Vec3::new(0.0, 0.4, 0.0),
            transparency: 0.5,
            ..Default::default()
        });
        scene.add_shape(Shape::Plane(Plane::new(Vec3::X, 3.0, red)));
        scene.add_shape(Shape::Plane(Plane::new(Vec3::X, 5.0, green)));
        scene.add_light(white_light_at(Vec3::ZERO));

        // The see-through recursion removes one shape per level, so it
        // resolves both planes without spending the mirror budget.
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let expected = Vec3::new(0.2, 0.1, 0.25);
        for depth in [1, 5] {
            let color = run_trace(&scene, &ray, depth).unwrap().unwrap();
            assert!((color - expected).length() < 1e-12, "depth {depth}");
        }
    }

    #[test]
    fn test_mirror_adds_reflected_surface() {
        let mut scene = empty_scene(Vec3::ZERO);
        let mirror = scene.add_material(Material {
            diffuse: Vec3::ZERO,
            reflect: Vec3::ONE,
            ..Default::default()
        });
        let green = scene.add_material(Material {
            diffuse: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        });
        // The ray hits the mirror sphere head-on and bounces straight
        // back through the origin onto the green sphere.
        scene.add_shape(Shape::Sphere(Sphere::new(
            Vec3::new(5.0, 0.0, 0.0),
            1.0,
            mirror,
        )));
        scene.add_shape(Shape::Sphere(Sphere::new(
            Vec3::new(-5.0, 0.0, 0.0),
            1.0,
            green,
        )));
        scene.add_light(white_light_at(Vec3::ZERO));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let color = run_trace(&scene, &ray, 5).unwrap().unwrap();
        assert!((color - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-12);

        // With a budget of 1 the bounce is refused and only the (black)
        // direct term remains.
        let color = run_trace(&scene, &ray, 1).unwrap().unwrap();
        assert_eq!(color, Vec3::ZERO);
    }

    #[test]
    fn test_channels_clamp_at_one() {
        let mut scene = empty_scene(Vec3::ZERO);
        let m = scene.add_material(Material {
            diffuse: Vec3::ONE,
            ..Default::default()
        });
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, m)));
        let mut hot = white_light_at(Vec3::ZERO);
        hot.rgb = Vec3::splat(3.0);
        scene.add_light(hot);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let color = run_trace(&scene, &ray, 5).unwrap().unwrap();
        assert_eq!(color, Vec3::ONE);
    }

    #[test]
    fn test_light_on_the_surface_fails_fast() {
        let mut scene = empty_scene(Vec3::ZERO);
        let m = scene.add_material(Material::default());
        scene.add_shape(Shape::Sphere(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, m)));
        // Exactly on the point the camera ray hits.
        scene.add_light(white_light_at(Vec3::new(4.0, 0.0, 0.0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let err = run_trace(&scene, &ray, 5).unwrap_err();
        assert!(matches!(err, RenderError::LightOnSurface(_)));
    }
}
