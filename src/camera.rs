use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            eye: config.eye,
            target: config.target,
            up: Vec3::Y,
            fov_y: config.fov_y_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, resolution: Vec2) -> Mat4 {
        let aspect = if resolution.y > 0.0 {
            resolution.x / resolution.y
        } else {
            1.0
        };
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn get_vp_matrix(&self, resolution: Vec2) -> Mat4 {
        self.projection_matrix(resolution) * self.view_matrix()
    }

    /// Projects a world position to window coordinates (origin top-left).
    /// Returns `None` for points behind the camera.
    pub fn project_to_screen(&self, point: Vec3, resolution: Vec2) -> Option<Vec2> {
        let clip = self.get_vp_matrix(resolution) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * resolution.x,
            (0.5 - ndc.y * 0.5) * resolution.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = Camera::from_config(&CameraConfig::default());
        let resolution = Vec2::new(1280.0, 720.0);

        let centre = camera.project_to_screen(Vec3::ZERO, resolution).unwrap();
        assert!((centre - resolution * 0.5).length() < 1e-3);
    }

    #[test]
    fn left_of_target_lands_left_of_centre() {
        let camera = Camera::from_config(&CameraConfig::default());
        let resolution = Vec2::new(800.0, 600.0);

        let left = camera
            .project_to_screen(Vec3::new(-7.0, 0.0, 0.0), resolution)
            .unwrap();
        assert!(left.x < 400.0);
    }

    #[test]
    fn points_behind_camera_are_not_projected() {
        let camera = Camera::from_config(&CameraConfig::default());
        let behind = camera.project_to_screen(Vec3::new(0.0, 2.0, 20.0), Vec2::new(800.0, 600.0));
        assert!(behind.is_none());
    }
}
