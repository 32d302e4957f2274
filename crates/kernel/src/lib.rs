//! Wall kernel: the focus-driven camera navigation engine.
//!
//! A [`Wall`] owns the layout, the single selection, the camera and per-item
//! hover looks. Pointer events and navigation changes update discrete state;
//! [`Wall::step`] advances the continuous state once per frame.
//!
//! # Invariants
//! - At most one item is selected; a selected id always names a layout item.
//! - Selection and the external focus identifier stay in one-to-one
//!   correspondence; adopting an external value never republishes it.
//! - Camera pose and hover looks change only inside `step`.
//! - Unknown identifiers resolve to the overview, never to an error.

pub mod camera;
pub mod config;
pub mod hover;
pub mod nav;
pub mod selection;
pub mod wall;

pub use camera::{CameraController, focus_pose};
pub use config::{ConfigError, WallConfig};
pub use hover::{HoverHighlighter, PanelLook};
pub use nav::{MemoryRouter, Navigator, Route};
pub use selection::{SelectionCause, SelectionEvent, SelectionMachine, SelectionState};
pub use wall::{CursorHint, FrameSnapshot, PanelFrame, Wall};

pub fn crate_info() -> &'static str {
    "mediawall-kernel v0.1.0"
}
