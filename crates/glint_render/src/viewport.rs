//! Camera model: turns pixel coordinates into primary rays.

use glint_math::{Ray, Vec3};
use glint_scene::Camera;

use crate::{RenderError, RenderResult};

/// An orthonormal camera frame plus the screen rectangle it looks through.
///
/// Built once per render from the scene camera and the output size; after
/// that [`Viewport::ray_through`] is pure arithmetic.
#[derive(Clone, Debug)]
pub struct Viewport {
    origin: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,
    screen_distance: f64,
    screen_width: f64,
    screen_height: f64,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Derive the camera frame for a `width` x `height` output.
    ///
    /// The stored up vector is the camera up with its forward component
    /// removed (Gram-Schmidt), so a roughly-vertical hint like `(0, 1, 0)`
    /// works for any viewing direction. The screen height is derived from
    /// the screen width so that pixels stay square.
    pub fn new(camera: &Camera, width: u32, height: u32) -> RenderResult<Self> {
        if camera.screen_distance <= 0.0 {
            return Err(RenderError::ScreenDistance(camera.screen_distance));
        }
        if camera.screen_width <= 0.0 {
            return Err(RenderError::ScreenWidth(camera.screen_width));
        }

        let forward = (camera.look_at - camera.position)
            .try_normalize()
            .ok_or(RenderError::CameraLookAt)?;
        let residual = camera.up - forward * (camera.up.dot(forward) / forward.dot(forward));
        let up = residual.try_normalize().ok_or(RenderError::CameraUp)?;
        let right = up.cross(forward).normalize();

        Ok(Self {
            origin: camera.position,
            forward,
            up,
            right,
            screen_distance: camera.screen_distance,
            screen_width: camera.screen_width,
            screen_height: camera.screen_width * height as f64 / width as f64,
            width,
            height,
        })
    }

    /// The primary ray for pixel `(x, y)`, with `(0, 0)` the top-left
    /// corner of the image.
    pub fn ray_through(&self, x: u32, y: u32) -> Ray {
        // Image rows grow downward, world up grows upward.
        let flipped = self.height - 1 - y;
        let w = (x as f64 / self.width as f64 - 0.5) * self.screen_width;
        let h = (flipped as f64 / self.height as f64 - 0.5) * self.screen_height;
        let target =
            self.origin + self.forward * self.screen_distance + self.up * h + self.right * w;
        Ray::new(self.origin, target - self.origin)
    }
}
