//! Pointer input for the wall.
//!
//! The core consumes exactly three event kinds: pointer enter, pointer leave,
//! and click (on an item or a miss). Hosts that only know what lies under the
//! cursor can use [`pick`] and [`HoverTracker`] to produce them.
//!
//! # Invariants
//! - Picking never mutates layout or selection; it only reports hits.

mod picking;
mod pointer;

pub use picking::{PickHit, Ray, pick};
pub use pointer::{HoverTracker, PointerEvent};

pub fn crate_info() -> &'static str {
    "mediawall-input v0.1.0"
}
