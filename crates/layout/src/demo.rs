use crate::{ItemDescriptor, Orientation, WallDocument};
use std::f32::consts::PI;

/// The nine-panel gallery wall: a centre piece, two panels behind it, and
/// three angled panels on each side.
pub fn demo_document() -> WallDocument {
    let side = PI / 2.5;
    let item = |position: [f32; 3], yaw: f32, image: &str| ItemDescriptor {
        position,
        rotation: Orientation::Euler([0.0, yaw, 0.0]),
        image: Some(image.to_string()),
    };
    WallDocument {
        origin: crate::DEFAULT_ORIGIN,
        items: vec![
            item([0.0, 0.0, 1.5], 0.0, "/assets/1.jpg"),
            item([-0.8, 0.0, -0.6], 0.0, "/assets/9.jpg"),
            item([0.8, 0.0, -0.6], 0.0, "/assets/10.jpg"),
            item([-1.75, 0.0, 0.25], side, "/assets/4.jpg"),
            item([-2.15, 0.0, 1.5], side, "/assets/back 1.jpg"),
            item([-2.0, 0.0, 2.75], side, "/assets/2.jpg"),
            item([1.75, 0.0, 0.25], -side, "/assets/7.jpg"),
            item([2.15, 0.0, 1.5], -side, "/assets/8.jpg"),
            item([2.0, 0.0, 2.75], -side, "/assets/main.jpg"),
        ],
    }
}
