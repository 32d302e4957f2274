use mediawall_kernel::FrameSnapshot;
use mediawall_layout::WallLayout;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer receives the frame description and the static layout and
/// produces output. It never mutates wall state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameSnapshot, layout: &WallLayout) -> Self::Output;
}

/// Human-readable frame dump, for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameSnapshot, layout: &WallLayout) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Wall frame {} (t={:.2}s) ===",
            frame.frame, frame.elapsed
        );
        let _ = writeln!(
            out,
            "Selected: {}",
            frame
                .selected
                .map(|id| id.to_string())
                .unwrap_or_else(|| "none".into())
        );
        let p = frame.camera.position;
        let (axis, angle) = frame.camera.rotation.to_axis_angle();
        let _ = writeln!(
            out,
            "Camera: pos=({:.3}, {:.3}, {:.3}) rot={:.1}deg about ({:.2}, {:.2}, {:.2})",
            p.x,
            p.y,
            p.z,
            angle.to_degrees(),
            axis.x,
            axis.y,
            axis.z
        );
        let _ = writeln!(out, "Cursor: {:?}", frame.cursor);

        for panel in &frame.panels {
            let image = layout
                .get(panel.index)
                .map(|item| item.image_ref.as_str())
                .unwrap_or("?");
            let c = panel.border.0;
            let marker = match (panel.focused, panel.hovered) {
                (true, _) => '*',
                (false, true) => '~',
                (false, false) => ' ',
            };
            let _ = writeln!(
                out,
                " {marker}[{}] {:.8} {image} border=({:.2}, {:.2}, {:.2}) zoom={:.2}",
                panel.index,
                panel.id.to_string(),
                c.x,
                c.y,
                c.z,
                panel.zoom
            );
        }

        out
    }
}
