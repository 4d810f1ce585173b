//! Three-sphere demo scene.
//!
//! Builds a scene in code instead of parsing one, renders it and saves
//! a PNG next to the working directory.

use glint_math::Vec3;
use glint_render::{render, RenderOptions};
use glint_scene::{Camera, Light, Material, Plane, RenderSettings, Scene, Shape, Sphere};

fn main() {
    println!("glint - three sphere demo");
    println!("=========================");

    let scene = build_scene();
    println!(
        "Scene: {} shapes, {} lights",
        scene.shape_count(),
        scene.light_count()
    );

    let options = RenderOptions {
        width: 800,
        height: 450,
        ..Default::default()
    };

    let start = std::time::Instant::now();
    let frame = render(&scene, &options).expect("render failed");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "spheres.png";
    frame
        .to_rgb_image()
        .save(filename)
        .expect("failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new(
        Camera {
            position: Vec3::new(0.0, 2.0, 10.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::Y,
            screen_distance: 1.5,
            screen_width: 2.0,
        },
        RenderSettings {
            background: Vec3::new(0.05, 0.07, 0.12),
            shadow_grid_size: 5,
            max_recursion_depth: 4,
        },
    );

    let floor = scene.add_material(Material {
        diffuse: Vec3::splat(0.6),
        specular: Vec3::splat(0.1),
        reflect: Vec3::splat(0.15),
        phong: 10.0,
        transparency: 0.0,
    });
    let matte_red = scene.add_material(Material {
        diffuse: Vec3::new(0.8, 0.15, 0.1),
        specular: Vec3::splat(0.4),
        reflect: Vec3::ZERO,
        phong: 30.0,
        transparency: 0.0,
    });
    let mirror = scene.add_material(Material {
        diffuse: Vec3::splat(0.05),
        specular: Vec3::splat(0.8),
        reflect: Vec3::splat(0.85),
        phong: 100.0,
        transparency: 0.0,
    });
    let glassy = scene.add_material(Material {
        diffuse: Vec3::new(0.1, 0.2, 0.3),
        specular: Vec3::splat(0.6),
        reflect: Vec3::ZERO,
        phong: 60.0,
        transparency: 0.6,
    });

    scene.add_shape(Shape::Plane(Plane::new(Vec3::Y, 0.0, floor)));
    scene.add_shape(Shape::Sphere(Sphere::new(
        Vec3::new(-2.2, 1.0, 0.0),
        1.0,
        matte_red,
    )));
    scene.add_shape(Shape::Sphere(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        mirror,
    )));
    scene.add_shape(Shape::Sphere(Sphere::new(
        Vec3::new(2.2, 1.0, 0.0),
        1.0,
        glassy,
    )));

    scene.add_light(Light {
        position: Vec3::new(4.0, 6.0, 6.0),
        rgb: Vec3::new(1.0, 0.95, 0.9),
        specular_intensity: 1.0,
        shadow_intensity: 0.6,
        radius: 1.0,
    });
    scene.add_light(Light {
        position: Vec3::new(-5.0, 4.0, 3.0),
        rgb: Vec3::new(0.3, 0.35, 0.45),
        specular_intensity: 0.5,
        shadow_intensity: 0.3,
        radius: 0.5,
    });

    scene
}
