use crate::config::WallConfig;
use crate::selection::SelectionState;
use glam::Vec3;
use mediawall_common::smooth::{damp_quat, damp_vec3};
use mediawall_common::{PANEL_HEIGHT, Pose};
use mediawall_layout::WallLayout;

/// Camera pose that frames the item at `index`: centred on the panel's
/// vertical middle, `focus_distance` out along the item's facing axis, looking
/// straight back at it.
pub fn focus_pose(layout: &WallLayout, index: usize, focus_distance: f32) -> Option<Pose> {
    let item = layout.item_pose(index)?;
    let eye = item.transform_point(Vec3::new(0.0, PANEL_HEIGHT * 0.5, focus_distance));
    Some(Pose::new(eye, item.rotation))
}

/// Owns the live camera pose and eases it toward the pose the current
/// selection asks for.
#[derive(Debug, Clone)]
pub struct CameraController {
    pose: Pose,
    target: Pose,
    overview: Pose,
    focus_distance: f32,
    position_tau: f32,
    orientation_tau: f32,
}

impl CameraController {
    /// Starts at rest on the overview pose.
    pub fn new(config: &WallConfig) -> Self {
        Self {
            pose: config.overview,
            target: config.overview,
            overview: config.overview,
            focus_distance: config.focus_distance,
            position_tau: config.position_tau,
            orientation_tau: config.orientation_tau,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn overview(&self) -> Pose {
        self.overview
    }

    /// Pose the camera should head for under `selection`. A selected id that
    /// is not on the wall falls back to the overview.
    pub fn target_for(&self, selection: SelectionState, layout: &WallLayout) -> Pose {
        let SelectionState::Selected(id) = selection else {
            return self.overview;
        };
        match layout
            .index_of(id)
            .and_then(|index| focus_pose(layout, index, self.focus_distance))
        {
            Some(pose) => pose,
            None => {
                tracing::warn!(id = %id, "selected item missing from layout; using overview");
                self.overview
            }
        }
    }

    /// Recompute the target from `selection`. Returns true if it moved.
    pub fn retarget(&mut self, selection: SelectionState, layout: &WallLayout) -> bool {
        let target = self.target_for(selection, layout);
        if target == self.target {
            return false;
        }
        tracing::debug!(
            x = target.position.x,
            y = target.position.y,
            z = target.position.z,
            "camera retarget"
        );
        self.target = target;
        true
    }

    /// Advance `dt` seconds toward the target.
    pub fn step(&mut self, dt: f32) {
        self.pose.position = damp_vec3(self.pose.position, self.target.position, self.position_tau, dt);
        self.pose.rotation = damp_quat(
            self.pose.rotation,
            self.target.rotation,
            self.orientation_tau,
            dt,
        );
    }

    pub fn distance_to_target(&self) -> f32 {
        self.pose.distance_to(&self.target)
    }

    pub fn angle_to_target(&self) -> f32 {
        self.pose.angle_to(&self.target)
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.distance_to_target() < epsilon && self.angle_to_target() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPS: f32 = 1e-3;
    const DT: f32 = 1.0 / 60.0;

    fn controller() -> (CameraController, WallLayout) {
        (CameraController::new(&WallConfig::default()), WallLayout::demo())
    }

    #[test]
    fn starts_on_overview() {
        let (cam, _) = controller();
        assert_eq!(cam.pose(), WallConfig::default().overview);
        assert!(cam.is_settled(EPS));
    }

    #[test]
    fn focus_pose_sits_in_front_of_panel() {
        let layout = WallLayout::demo();
        let pose = focus_pose(&layout, 0, 1.25).unwrap();
        // Item 0 stands at (0, -0.5, 1.5) facing +Z.
        let expected = Vec3::new(0.0, -0.5 + PANEL_HEIGHT * 0.5, 1.5 + 1.25);
        assert!((pose.position - expected).length() < 1e-5);
        assert_eq!(pose.rotation, Quat::IDENTITY);
        assert!(focus_pose(&layout, 99, 1.25).is_none());
    }

    #[test]
    fn focus_pose_follows_item_rotation() {
        let layout = WallLayout::demo();
        let item = layout.item_pose(3).unwrap();
        let pose = focus_pose(&layout, 3, 1.25).unwrap();
        let offset = pose.position - item.position;
        let facing = item.rotation * Vec3::Z;
        let along = offset.dot(facing);
        assert!((along - 1.25).abs() < 1e-5);
        // Camera looks back at the panel face.
        assert!(pose.forward().dot(facing) < -0.999);
    }

    #[test]
    fn converges_monotonically_within_bound() {
        let (mut cam, layout) = controller();
        let id = layout.items()[0].id;
        cam.retarget(SelectionState::Selected(id), &layout);
        let tau = WallConfig::default().position_tau;
        let max_steps = (10.0 * tau / DT).ceil() as usize;
        let mut last = cam.distance_to_target();
        let mut steps = 0;
        while cam.distance_to_target() >= EPS {
            cam.step(DT);
            let d = cam.distance_to_target();
            assert!(d < last, "distance must strictly decrease");
            last = d;
            steps += 1;
            assert!(steps <= max_steps, "took more than {max_steps} steps");
        }
    }

    #[test]
    fn frame_rate_independent() {
        let (mut fine, layout) = controller();
        let mut coarse = fine.clone();
        let id = layout.items()[4].id;
        fine.retarget(SelectionState::Selected(id), &layout);
        coarse.retarget(SelectionState::Selected(id), &layout);

        for _ in 0..120 {
            fine.step(1.0 / 120.0);
        }
        for _ in 0..4 {
            coarse.step(0.25);
        }
        assert!(fine.pose().distance_to(&coarse.pose()) < EPS);
        assert!(fine.pose().angle_to(&coarse.pose()) < 1e-2);
    }

    #[test]
    fn settled_step_is_noop() {
        let (mut cam, _) = controller();
        let before = cam.pose();
        cam.step(DT);
        assert_eq!(cam.pose(), before);
    }

    #[test]
    fn unknown_selection_targets_overview() {
        let (mut cam, layout) = controller();
        let ghost = mediawall_common::identify("ghost.jpg", 0);
        cam.retarget(SelectionState::Selected(ghost), &layout);
        assert_eq!(cam.target(), cam.overview());
    }

    #[test]
    fn zero_dt_does_not_move() {
        let (mut cam, layout) = controller();
        cam.retarget(SelectionState::Selected(layout.items()[0].id), &layout);
        let before = cam.pose();
        cam.step(0.0);
        assert_eq!(cam.pose(), before);
    }
}
