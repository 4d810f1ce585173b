//! CPU Whitted ray tracer.
//!
//! The pipeline: a [`Viewport`] turns pixel coordinates into primary
//! rays, the intersection engine finds the nearest surface, and the
//! shader lights it recursively (shadows, transparency, mirror
//! bounces). [`render`] drives the whole thing row by row in parallel.
//!
//! Every row seeds its own random generator from `seed + row`, so a
//! render is reproducible bit for bit regardless of how rayon schedules
//! the rows.

use std::time::Instant;

use glint_math::Vec3;
use glint_scene::{Scene, SceneError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use thiserror::Error;

mod frame;
mod intersect;
mod shade;
mod shadow;
mod viewport;

pub use frame::Frame;
pub use intersect::{
    nearest_hit, Hit, ShapeSet, Surface, PLANE_PARALLEL_ATOL, SPHERE_TANGENT_ATOL,
};
pub use viewport::Viewport;

/// Linear RGB, one channel per component.
pub type Color = Vec3;

/// What to do with a point whose light ray reaches some other surface
/// first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShadowPolicy {
    /// Hard cutoff: the light contributes nothing to the point.
    #[default]
    Skip,
    /// Keep the light and let the soft-shadow factor attenuate it.
    Attenuate,
}

/// Per-render knobs that are not part of the scene description.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Output width in pixels.
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Occlusion handling for hard shadows.
    pub shadow_policy: ShadowPolicy,

    /// Base seed for soft-shadow jitter. Row `y` uses `seed + y`.
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            shadow_policy: ShadowPolicy::Skip,
            seed: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("camera position and look-at point coincide")]
    CameraLookAt,

    #[error("camera up vector has no component perpendicular to the viewing direction")]
    CameraUp,

    #[error("screen distance must be positive, got {0}")]
    ScreenDistance(f64),

    #[error("screen width must be positive, got {0}")]
    ScreenWidth(f64),

    #[error("light at {0} lies on a surface it illuminates")]
    LightOnSurface(Vec3),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render `scene` into a [`Frame`].
///
/// Rows are distributed across the rayon thread pool; the first error
/// from any row aborts the render.
pub fn render(scene: &Scene, options: &RenderOptions) -> RenderResult<Frame> {
    scene.validate()?;
    let viewport = Viewport::new(&scene.camera, options.width, options.height)?;

    let start = Instant::now();
    let rows: Vec<Vec<Color>> = (0..options.height)
        .into_par_iter()
        .map(|y| render_row(scene, options, &viewport, y))
        .collect::<RenderResult<_>>()?;

    let mut frame = Frame::new(options.width, options.height);
    for (y, row) in rows.into_iter().enumerate() {
        for (x, color) in row.into_iter().enumerate() {
            frame.set(x as u32, y as u32, color);
        }
    }

    log::info!(
        "rendered {}x{} ({} shapes, {} lights) in {:.2?}",
        options.width,
        options.height,
        scene.shape_count(),
        scene.light_count(),
        start.elapsed()
    );
    Ok(frame)
}

fn render_row(
    scene: &Scene,
    options: &RenderOptions,
    viewport: &Viewport,
    y: u32,
) -> RenderResult<Vec<Color>> {
    let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(y as u64));
    let shapes = ShapeSet::all(scene.shape_count());
    let depth = scene.settings.max_recursion_depth;

    let mut row = Vec::with_capacity(options.width as usize);
    for x in 0..options.width {
        let ray = viewport.ray_through(x, y);
        let color = shade::trace(&ray, scene, options, &shapes, depth, &mut rng)?
            .unwrap_or(scene.settings.background);
        row.push(color);
    }
    Ok(row)
}
