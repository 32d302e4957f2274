use crate::config::WallConfig;
use glam::Vec2;
use mediawall_common::Color;
use mediawall_common::smooth::{damp_color, damp_vec2};
use mediawall_layout::WallLayout;
use std::f32::consts::TAU;

/// Per-panel animated look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLook {
    pub hovered: bool,
    /// Border color, eased toward the highlight while hovered.
    pub border: Color,
    /// Image scale inside the frame.
    pub image_scale: Vec2,
    /// Texture zoom of the image, drifting slowly over time.
    pub zoom: f32,
    phase: f32,
}

/// Eases each panel's border color and image scale toward its hover target.
///
/// Hover flags are independent per panel; several may be set at once.
#[derive(Debug, Clone)]
pub struct HoverHighlighter {
    panels: Vec<PanelLook>,
    tau: f32,
    base: Color,
    highlight: Color,
    image_scale: Vec2,
    hover_shrink: Vec2,
    zoom_base: f32,
    zoom_amplitude: f32,
    zoom_rate: f32,
}

impl HoverHighlighter {
    pub fn new(layout: &WallLayout, config: &WallConfig) -> Self {
        let panels = layout
            .items()
            .iter()
            .map(|item| {
                let phase = item.id.unit_phase() * TAU;
                PanelLook {
                    hovered: false,
                    border: config.base_color,
                    image_scale: config.image_scale,
                    zoom: config.zoom_base + phase.sin() * config.zoom_amplitude,
                    phase,
                }
            })
            .collect();
        Self {
            panels,
            tau: config.hover_tau,
            base: config.base_color,
            highlight: config.highlight_color,
            image_scale: config.image_scale,
            hover_shrink: config.hover_shrink,
            zoom_base: config.zoom_base,
            zoom_amplitude: config.zoom_amplitude,
            zoom_rate: config.zoom_rate,
        }
    }

    pub fn panels(&self) -> &[PanelLook] {
        &self.panels
    }

    pub fn get(&self, index: usize) -> Option<&PanelLook> {
        self.panels.get(index)
    }

    /// Set the hover flag of a panel. Returns true if it changed.
    pub fn set_hovered(&mut self, index: usize, hovered: bool) -> bool {
        let Some(panel) = self.panels.get_mut(index) else {
            return false;
        };
        if panel.hovered == hovered {
            return false;
        }
        panel.hovered = hovered;
        tracing::trace!(index, hovered, "hover changed");
        true
    }

    pub fn any_hovered(&self) -> bool {
        self.panels.iter().any(|p| p.hovered)
    }

    pub fn hovered_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.panels
            .iter()
            .enumerate()
            .filter(|(_, p)| p.hovered)
            .map(|(i, _)| i)
    }

    /// Advance all panels by `dt`. `elapsed` is total loop time, which drives
    /// the zoom drift; the focused panel never shrinks on hover.
    pub fn step(&mut self, dt: f32, elapsed: f32, focused: Option<usize>) {
        for (index, panel) in self.panels.iter_mut().enumerate() {
            let shrink = panel.hovered && focused != Some(index);
            let (color, scale) = if shrink {
                (self.highlight, self.image_scale * self.hover_shrink)
            } else if panel.hovered {
                (self.highlight, self.image_scale)
            } else {
                (self.base, self.image_scale)
            };
            panel.border = damp_color(panel.border, color, self.tau, dt);
            panel.image_scale = damp_vec2(panel.image_scale, scale, self.tau, dt);
            panel.zoom =
                self.zoom_base + (panel.phase + elapsed * self.zoom_rate).sin() * self.zoom_amplitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter() -> HoverHighlighter {
        HoverHighlighter::new(&WallLayout::demo(), &WallConfig::default())
    }

    #[test]
    fn starts_at_base_color() {
        let h = highlighter();
        assert_eq!(h.panels().len(), 9);
        assert!(h.panels().iter().all(|p| p.border == Color::WHITE && !p.hovered));
        assert!(!h.any_hovered());
    }

    #[test]
    fn hovered_panel_blends_to_highlight_and_back() {
        let mut h = highlighter();
        assert!(h.set_hovered(2, true));
        assert!(!h.set_hovered(2, true));
        for _ in 0..120 {
            h.step(1.0 / 60.0, 0.0, None);
        }
        assert!(h.get(2).unwrap().border.distance(Color::ORANGE) < 1e-3);
        assert_eq!(h.get(0).unwrap().border, Color::WHITE);

        h.set_hovered(2, false);
        let mut last = h.get(2).unwrap().border.distance(Color::WHITE);
        for _ in 0..120 {
            h.step(1.0 / 60.0, 0.0, None);
            let d = h.get(2).unwrap().border.distance(Color::WHITE);
            assert!(d <= last);
            last = d;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn concurrent_hovers_are_independent() {
        let mut h = highlighter();
        h.set_hovered(1, true);
        h.set_hovered(5, true);
        assert_eq!(h.hovered_indices().collect::<Vec<_>>(), vec![1, 5]);
        for _ in 0..120 {
            h.step(1.0 / 60.0, 0.0, None);
        }
        assert!(h.get(1).unwrap().border.distance(Color::ORANGE) < 1e-3);
        assert!(h.get(5).unwrap().border.distance(Color::ORANGE) < 1e-3);
    }

    #[test]
    fn focused_panel_keeps_full_image_scale() {
        let config = WallConfig::default();
        let mut h = highlighter();
        h.set_hovered(0, true);
        h.set_hovered(1, true);
        for _ in 0..120 {
            h.step(1.0 / 60.0, 0.0, Some(0));
        }
        assert!((h.get(0).unwrap().image_scale - config.image_scale).length() < 1e-4);
        let shrunk = config.image_scale * config.hover_shrink;
        assert!((h.get(1).unwrap().image_scale - shrunk).length() < 1e-3);
    }

    #[test]
    fn zoom_stays_in_band() {
        let mut h = highlighter();
        for i in 0..100 {
            h.step(0.1, i as f32 * 0.7, None);
            for p in h.panels() {
                assert!(p.zoom >= 1.5 - 1e-5 && p.zoom <= 2.5 + 1e-5);
            }
        }
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut h = highlighter();
        assert!(!h.set_hovered(99, true));
    }
}
