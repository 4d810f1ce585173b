//! Line-oriented scene text parser.
//!
//! Each non-blank line is a 3-letter code followed by whitespace-separated
//! numeric fields:
//!
//! - `cam`: position(3) look_at(3) up(3) screen_distance screen_width
//! - `set`: background(3) shadow_grid_size max_recursion_depth
//! - `mtl`: diffuse(3) specular(3) reflect(3) phong transparency
//! - `sph`: center(3) radius material_index
//! - `pln`: normal(3) offset material_index
//! - `box`: center(3) side_length material_index
//! - `lgt`: position(3) rgb(3) specular_intensity shadow_intensity radius
//!
//! Lines starting with `#` and blank lines are skipped. Unknown codes are
//! skipped too (deliberate leniency, logged at debug level); a known code
//! with the wrong field count or a malformed number is an error. Exactly
//! one `cam` and one `set` are expected; a repeat overwrites with a
//! warning, a missing one fails.

use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::{
    Camera, Cube, Light, Material, Plane, RenderSettings, Scene, SceneError, Shape, Sphere,
};

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: `{code}` takes {expected} values, found {found}")]
    FieldCount {
        line: usize,
        code: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number `{value}`")]
    InvalidNumber { line: usize, value: String },

    #[error("scene defines no camera (`cam` line)")]
    MissingCamera,

    #[error("scene defines no render settings (`set` line)")]
    MissingSettings,

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Load a scene file, parse it, and validate the result.
pub fn load_scene<P: AsRef<Path>>(path: P) -> ParseResult<Scene> {
    let content = std::fs::read_to_string(path)?;
    let scene = parse_scene(&content)?;
    scene.validate()?;

    log::info!(
        "scene: {} materials, {} lights, {} shapes",
        scene.material_count(),
        scene.light_count(),
        scene.shape_count()
    );

    Ok(scene)
}

/// Parse scene text. The result is not yet validated; callers that go on
/// to render should run [`Scene::validate`] (or use [`load_scene`]).
pub fn parse_scene(content: &str) -> ParseResult<Scene> {
    let mut camera = None;
    let mut settings = None;
    let mut materials = Vec::new();
    let mut lights = Vec::new();
    let mut shapes = Vec::new();

    for (number, raw) in content.lines().enumerate() {
        let number = number + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let code = fields.next().unwrap_or("");
        let values = parse_numbers(number, fields)?;

        match code {
            "cam" => {
                expect_fields(number, code, &values, 11)?;
                if camera.is_some() {
                    log::warn!("line {number}: camera redefined, keeping the last one");
                }
                camera = Some(Camera {
                    position: vec3_at(&values, 0),
                    look_at: vec3_at(&values, 3),
                    up: vec3_at(&values, 6),
                    screen_distance: values[9],
                    screen_width: values[10],
                });
            }
            "set" => {
                expect_fields(number, code, &values, 5)?;
                if settings.is_some() {
                    log::warn!("line {number}: render settings redefined, keeping the last ones");
                }
                settings = Some(RenderSettings {
                    background: vec3_at(&values, 0),
                    shadow_grid_size: values[3] as u32,
                    max_recursion_depth: values[4] as u32,
                });
            }
            "mtl" => {
                expect_fields(number, code, &values, 11)?;
                materials.push(Material {
                    diffuse: vec3_at(&values, 0),
                    specular: vec3_at(&values, 3),
                    reflect: vec3_at(&values, 6),
                    phong: values[9],
                    transparency: values[10],
                });
            }
            "sph" => {
                expect_fields(number, code, &values, 5)?;
                shapes.push(Shape::Sphere(Sphere::new(
                    vec3_at(&values, 0),
                    values[3],
                    values[4] as usize,
                )));
            }
            "pln" => {
                expect_fields(number, code, &values, 5)?;
                shapes.push(Shape::Plane(Plane::new(
                    vec3_at(&values, 0),
                    values[3],
                    values[4] as usize,
                )));
            }
            "box" => {
                expect_fields(number, code, &values, 5)?;
                shapes.push(Shape::Cube(Cube::new(
                    vec3_at(&values, 0),
                    values[3],
                    values[4] as usize,
                )));
            }
            "lgt" => {
                expect_fields(number, code, &values, 9)?;
                lights.push(Light {
                    position: vec3_at(&values, 0),
                    rgb: vec3_at(&values, 3),
                    specular_intensity: values[6],
                    shadow_intensity: values[7],
                    radius: values[8],
                });
            }
            _ => {
                log::debug!("line {number}: ignoring unknown code `{code}`");
            }
        }
    }

    let camera = camera.ok_or(ParseError::MissingCamera)?;
    let settings = settings.ok_or(ParseError::MissingSettings)?;

    Ok(Scene {
        camera,
        settings,
        materials,
        lights,
        shapes,
    })
}

fn parse_numbers<'a>(
    line: usize,
    fields: impl Iterator<Item = &'a str>,
) -> ParseResult<Vec<f64>> {
    fields
        .map(|field| {
            field.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                line,
                value: field.to_string(),
            })
        })
        .collect()
}

fn expect_fields(line: usize, code: &str, values: &[f64], expected: usize) -> ParseResult<()> {
    if values.len() != expected {
        return Err(ParseError::FieldCount {
            line,
            code: code.to_string(),
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

fn vec3_at(values: &[f64], at: usize) -> Vec3 {
    Vec3::new(values[at], values[at + 1], values[at + 2])
}
