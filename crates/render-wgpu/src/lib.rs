//! wgpu render backend for the media wall.
//!
//! Draws a floor grid and, per panel, three boxes: the dark frame, the
//! unlit border and the image plate. The view follows the kernel's camera
//! pose; this crate only reads frame snapshots.
//!
//! # Invariants
//! - Rendering never mutates wall state.
//! - Screen rays use the same projection the frame is drawn with.

mod camera;
mod gpu;
mod shaders;

pub use camera::ViewCamera;
pub use gpu::{WgpuRenderer, panel_instances};
