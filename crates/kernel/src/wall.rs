use crate::camera::CameraController;
use crate::config::WallConfig;
use crate::hover::HoverHighlighter;
use crate::nav::{MemoryRouter, Navigator};
use crate::selection::{SelectionEvent, SelectionMachine, SelectionState};
use glam::Vec2;
use mediawall_common::{Color, ItemId, Pose};
use mediawall_input::PointerEvent;
use mediawall_layout::WallLayout;

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Pointer,
}

/// What the renderer needs for one panel this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    pub index: usize,
    pub id: ItemId,
    pub border: Color,
    pub image_scale: Vec2,
    pub zoom: f32,
    pub hovered: bool,
    pub focused: bool,
}

/// Output of one [`Wall::step`]: everything a renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Total smoothed time in seconds.
    pub elapsed: f32,
    pub camera: Pose,
    pub selected: Option<ItemId>,
    pub panels: Vec<PanelFrame>,
    pub cursor: CursorHint,
}

/// One media wall session.
///
/// Holds the layout plus all per-session state as instance data. Pointer
/// events and navigation only touch selection and hover flags; continuous
/// state moves in [`Wall::step`].
pub struct Wall<N: Navigator = MemoryRouter> {
    layout: WallLayout,
    config: WallConfig,
    selection: SelectionMachine,
    camera: CameraController,
    hover: HoverHighlighter,
    navigator: N,
    /// Last navigation value seen or written, used to tell out-of-band
    /// changes from our own writes.
    nav_seen: Option<String>,
    elapsed: f32,
    frame: u64,
}

impl<N: Navigator> Wall<N> {
    /// Build a session and adopt whatever the navigator currently names.
    pub fn new(layout: WallLayout, config: WallConfig, navigator: N) -> Self {
        let camera = CameraController::new(&config);
        let hover = HoverHighlighter::new(&layout, &config);
        let mut wall = Self {
            layout,
            config,
            selection: SelectionMachine::new(),
            camera,
            hover,
            navigator,
            nav_seen: None,
            elapsed: 0.0,
            frame: 0,
        };
        let initial = wall.navigator.current();
        wall.adopt_navigation(initial.as_deref());
        wall.camera.retarget(wall.selection.state(), &wall.layout);
        tracing::info!(
            items = wall.layout.len(),
            selected = ?wall.selection.selected(),
            "wall session started"
        );
        wall
    }

    pub fn layout(&self) -> &WallLayout {
        &self.layout
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn hover(&self) -> &HoverHighlighter {
        &self.hover
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Mutable access for hosts that drive navigation (back/forward, typed
    /// routes). Changes are picked up by the next [`Wall::sync_navigation`].
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn drain_events(&mut self) -> Vec<SelectionEvent> {
        self.selection.drain_events()
    }

    pub fn events(&self) -> &[SelectionEvent] {
        self.selection.events()
    }

    /// Adopt an external focus value as authoritative. Never publishes.
    /// Malformed or unknown values resolve to `Unselected`.
    pub fn adopt_navigation(&mut self, value: Option<&str>) -> bool {
        self.nav_seen = value.map(str::to_string);
        let target = match value {
            None => None,
            Some(s) if s.trim().is_empty() => None,
            Some(s) => match ItemId::parse(s) {
                Some(id) => Some(id),
                None => {
                    tracing::warn!(value = s, "navigation value is not an item id; showing overview");
                    None
                }
            },
        };
        self.selection.adopt(target, &self.layout)
    }

    /// Poll the navigator and adopt its value if it changed out of band.
    pub fn sync_navigation(&mut self) -> bool {
        let current = self.navigator.current();
        if current == self.nav_seen {
            return false;
        }
        tracing::debug!(value = ?current, "navigation changed out of band");
        self.adopt_navigation(current.as_deref())
    }

    /// Apply one pointer event.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter(id) => self.set_hover(id, true),
            PointerEvent::Leave(id) => self.set_hover(id, false),
            PointerEvent::Click(Some(id)) => {
                self.sync_navigation();
                self.selection.click_item(id, &self.layout);
                self.publish();
            }
            PointerEvent::Click(None) => {
                self.sync_navigation();
                self.selection.click_miss();
                self.publish();
            }
        }
    }

    fn set_hover(&mut self, id: ItemId, hovered: bool) {
        match self.layout.index_of(id) {
            Some(index) => {
                self.hover.set_hovered(index, hovered);
            }
            None => tracing::debug!(id = %id, "hover on unknown item ignored"),
        }
    }

    /// Write the selection out to navigation unless it already says so.
    fn publish(&mut self) {
        let desired = self.selection.selected().map(|id| id.to_string());
        if desired == self.nav_seen {
            return;
        }
        self.navigator.navigate(desired.as_deref());
        self.nav_seen = desired;
    }

    /// Advance continuous state by `dt` seconds and describe the frame.
    pub fn step(&mut self, dt: f32) -> FrameSnapshot {
        let _span = tracing::trace_span!("wall_step", frame = self.frame).entered();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let dt = match self.config.max_frame_dt {
            Some(max) => dt.min(max),
            None => dt,
        };

        self.sync_navigation();
        let selection = self.selection.state();
        self.camera.retarget(selection, &self.layout);
        self.camera.step(dt);

        self.elapsed += dt;
        let focused = selection.selected().and_then(|id| self.layout.index_of(id));
        self.hover.step(dt, self.elapsed, focused);
        self.frame += 1;

        self.snapshot()
    }

    /// Describe the current state without advancing it.
    pub fn snapshot(&self) -> FrameSnapshot {
        let selected = self.selection.selected();
        let panels = self
            .layout
            .items()
            .iter()
            .zip(self.hover.panels())
            .map(|(item, look)| PanelFrame {
                index: item.index,
                id: item.id,
                border: look.border,
                image_scale: look.image_scale,
                zoom: look.zoom,
                hovered: look.hovered,
                focused: selected == Some(item.id),
            })
            .collect();
        FrameSnapshot {
            frame: self.frame,
            elapsed: self.elapsed,
            camera: self.camera.pose(),
            selected,
            panels,
            cursor: if self.hover.any_hovered() {
                CursorHint::Pointer
            } else {
                CursorHint::Default
            },
        }
    }

    /// End the session, handing the navigator back to the host.
    pub fn close(self) -> N {
        tracing::info!(frames = self.frame, "wall session closed");
        self.navigator
    }
}
