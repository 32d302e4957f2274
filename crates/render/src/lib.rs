//! Rendering adapter: renderer-agnostic interface plus the render loop.
//!
//! # Invariants
//! - Renderers read a [`FrameSnapshot`](mediawall_kernel::FrameSnapshot); they
//!   never mutate the wall.
//! - The loop is the only thing that advances continuous wall state.
//! - A stopped loop never schedules another frame.

mod frame_loop;
mod renderer;

pub use frame_loop::{FrameHost, FrameTimer, LoopState, LoopStats, RenderLoop, ScheduleError};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "mediawall-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
