//! Shared types for the media wall: deterministic item identity, poses,
//! colors, and the exponential damping law used by every animated quantity.

mod ident;
pub mod smooth;
mod types;

pub use ident::{ItemId, identify};
pub use types::{
    Color, GOLDEN_RATIO, PANEL_DEPTH, PANEL_HEIGHT, PANEL_WIDTH, Pose,
};
