//! Perspective camera on the +Z axis, looking at the sphere center.

use glam::Vec3;

/// Never dolly inside this distance; keeps the camera outside the sphere.
pub const MIN_DISTANCE: f32 = 800.0;
/// Close-up distance for the winner reveal.
pub const CLOSE_UP_DISTANCE: f32 = 850.0;
/// Portrait viewports pull the camera in so the planet still fills the view.
/// Tunable heuristic, not a derivation.
pub const PORTRAIT_FACTOR: f32 = 0.85;

const FOV_Y_RAD: f32 = 60.0 * std::f32::consts::PI / 180.0;
const NEAR: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Distance from the origin along +Z.
    pub distance: f32,
    /// Paint surface size in points.
    pub viewport: (f32, f32),
}

impl Camera {
    pub fn new(viewport: (f32, f32), radius: f32) -> Self {
        let mut cam = Self { distance: 0.0, viewport };
        cam.distance = cam.ideal_distance(radius);
        cam
    }

    /// Fit the sphere (plus margin) into the vertical field of view, with
    /// the portrait boost and the minimum-distance floor.
    pub fn ideal_distance(&self, radius: f32) -> f32 {
        let (w, h) = self.viewport;
        let aspect = if h > 0.0 { w / h } else { 1.0 };
        let target = radius * 1.2;
        let mut dist = target / (FOV_Y_RAD / 2.0).tan();
        if aspect < 1.0 {
            dist = dist / aspect * PORTRAIT_FACTOR;
        }
        dist.max(MIN_DISTANCE)
    }

    /// Project a world point to viewport-local coordinates. Returns the
    /// screen position and the view-space depth; `None` behind the near
    /// plane.
    pub fn project(&self, world: Vec3) -> Option<(egui::Pos2, f32)> {
        let depth = self.distance - world.z;
        if depth <= NEAR {
            return None;
        }
        let (w, h) = self.viewport;
        let focal = 0.5 * h / (FOV_Y_RAD / 2.0).tan();
        let sx = w * 0.5 + world.x * focal / depth;
        let sy = h * 0.5 - world.y * focal / depth;
        Some((egui::pos2(sx, sy), depth))
    }

    /// Screen length of a world-space extent at the given depth.
    pub fn project_len(&self, len: f32, depth: f32) -> f32 {
        let (_, h) = self.viewport;
        let focal = 0.5 * h / (FOV_Y_RAD / 2.0).tan();
        len * focal / depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_distance_fits_the_sphere() {
        let cam = Camera::new((1280.0, 800.0), 600.0);
        // 720 / tan(30°) ≈ 1247
        assert!((cam.distance - 1247.0).abs() < 2.0, "got {}", cam.distance);
    }

    #[test]
    fn ideal_distance_floors_at_minimum() {
        let cam = Camera::new((1280.0, 800.0), 100.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
    }

    #[test]
    fn portrait_viewport_pulls_closer_relative_to_aspect() {
        let landscape = Camera::new((1200.0, 800.0), 600.0);
        let portrait = Camera::new((400.0, 800.0), 600.0);
        let base = landscape.ideal_distance(600.0);
        assert!((portrait.distance - base / 0.5 * PORTRAIT_FACTOR).abs() < 1.0);
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let cam = Camera::new((1000.0, 500.0), 600.0);
        let (pos, depth) = cam.project(Vec3::ZERO).unwrap();
        assert_eq!(pos, egui::pos2(500.0, 250.0));
        assert_eq!(depth, cam.distance);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let cam = Camera::new((1000.0, 500.0), 600.0);
        assert!(cam.project(Vec3::new(0.0, 0.0, cam.distance + 10.0)).is_none());
    }
}
