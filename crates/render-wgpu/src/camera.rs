use glam::{Mat4, Vec2, Vec3};
use mediawall_common::Pose;
use mediawall_input::Ray;

/// Projection for the wall view. The pose comes from the kernel camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            fov: 70.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl ViewCamera {
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self, pose: &Pose) -> Mat4 {
        Mat4::from_rotation_translation(pose.rotation, pose.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self, pose: &Pose) -> Mat4 {
        self.projection_matrix() * self.view_matrix(pose)
    }

    /// World ray through a cursor position given in physical pixels, origin
    /// top-left. `None` for an empty viewport.
    pub fn screen_ray(&self, pose: &Pose, cursor: Vec2, size: Vec2) -> Option<Ray> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(2.0 * cursor.x / size.x - 1.0, 1.0 - 2.0 * cursor.y / size.y);
        let half_h = (self.fov * 0.5).tan();
        let local = Vec3::new(ndc.x * half_h * self.aspect, ndc.y * half_h, -1.0);
        Ray::new(pose.position, pose.rotation * local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec4};
    use mediawall_input::pick;
    use mediawall_layout::WallLayout;

    fn overview() -> Pose {
        Pose::new(Vec3::new(0.0, 0.0, 5.5), Quat::IDENTITY)
    }

    #[test]
    fn default_projection_is_finite() {
        let cam = ViewCamera::default();
        let vp = cam.view_projection(&overview());
        assert!(vp.is_finite());
    }

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let cam = ViewCamera::default();
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.7));
        let eye = cam.view_matrix(&pose).transform_point3(pose.position);
        assert!(eye.length() < 1e-5);
    }

    #[test]
    fn centre_ray_looks_forward() {
        let cam = ViewCamera::default();
        let pose = Pose::new(Vec3::ZERO, Quat::from_rotation_y(1.2));
        let ray = cam
            .screen_ray(&pose, Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0))
            .unwrap();
        assert!(ray.dir.distance(pose.forward()) < 1e-5);
    }

    #[test]
    fn screen_ray_matches_projection() {
        let mut cam = ViewCamera::default();
        cam.set_viewport(800, 600);
        let pose = overview();
        let ray = cam
            .screen_ray(&pose, Vec2::new(600.0, 150.0), Vec2::new(800.0, 600.0))
            .unwrap();
        let clip = cam.view_projection(&pose) * Vec4::from((ray.at(10.0), 1.0));
        let ndc = clip.truncate() / clip.w;
        assert!((ndc.x - 0.5).abs() < 1e-4);
        assert!((ndc.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn centre_of_overview_picks_front_panel() {
        let cam = ViewCamera::default();
        let layout = WallLayout::demo();
        let ray = cam
            .screen_ray(&overview(), Vec2::new(640.0, 360.0), Vec2::new(1280.0, 720.0))
            .unwrap();
        let hit = pick(&layout, ray).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn empty_viewport_has_no_ray() {
        let cam = ViewCamera::default();
        assert!(cam.screen_ray(&overview(), Vec2::ZERO, Vec2::ZERO).is_none());
    }
}
