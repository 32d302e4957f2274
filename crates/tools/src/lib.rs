//! Developer tooling: read-only wall inspection for debug panels and the CLI.
//!
//! # Invariants
//! - Inspection never mutates a wall.

mod inspector;

pub use inspector::{ItemInfo, WallInspector, WallSummary};

pub fn crate_info() -> &'static str {
    "mediawall-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
