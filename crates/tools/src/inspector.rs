use glam::Vec3;
use mediawall_common::ItemId;
use mediawall_kernel::{Navigator, Wall};

/// Read-only queries against a running wall.
pub struct WallInspector;

impl WallInspector {
    pub fn summary<N: Navigator>(wall: &Wall<N>) -> WallSummary {
        let camera = wall.camera();
        WallSummary {
            frame: wall.frame_count(),
            elapsed: wall.elapsed(),
            items: wall.layout().len(),
            selected: wall.selection().selected(),
            navigation: wall.navigator().current(),
            camera_position: camera.pose().position,
            distance_to_target: camera.distance_to_target(),
            angle_to_target: camera.angle_to_target(),
            hovered: wall.hover().hovered_indices().collect(),
            pending_events: wall.events().len(),
        }
    }

    /// Layout and live look of one item.
    pub fn inspect_item<N: Navigator>(wall: &Wall<N>, id: ItemId) -> Option<ItemInfo> {
        let layout = wall.layout();
        let index = layout.index_of(id)?;
        let item = layout.get(index)?;
        let pose = layout.item_pose(index)?;
        let look = wall.hover().get(index)?;
        Some(ItemInfo {
            index,
            id,
            caption: id.caption(),
            image_ref: item.image_ref.clone(),
            world_position: pose.position,
            hovered: look.hovered,
            zoom: look.zoom,
            selected: wall.selection().selected() == Some(id),
        })
    }
}

#[derive(Debug, Clone)]
pub struct WallSummary {
    pub frame: u64,
    pub elapsed: f32,
    pub items: usize,
    pub selected: Option<ItemId>,
    pub navigation: Option<String>,
    pub camera_position: Vec3,
    pub distance_to_target: f32,
    pub angle_to_target: f32,
    pub hovered: Vec<usize>,
    pub pending_events: usize,
}

impl std::fmt::Display for WallSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let selected = self.selected.map_or_else(|| "none".to_string(), |id| id.short());
        write!(
            f,
            "Wall: frame={} t={:.2}s items={} selected={} nav={} camera=({:.2}, {:.2}, {:.2}) \
             to_target={:.3}m/{:.1}deg hovered={:?}",
            self.frame,
            self.elapsed,
            self.items,
            selected,
            self.navigation.as_deref().unwrap_or("-"),
            self.camera_position.x,
            self.camera_position.y,
            self.camera_position.z,
            self.distance_to_target,
            self.angle_to_target.to_degrees(),
            self.hovered,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ItemInfo {
    pub index: usize,
    pub id: ItemId,
    pub caption: String,
    pub image_ref: String,
    pub world_position: Vec3,
    pub hovered: bool,
    pub zoom: f32,
    pub selected: bool,
}

impl std::fmt::Display for ItemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item [{}] {} ({}) pos=({:.2}, {:.2}, {:.2}) zoom={:.3}{}{}",
            self.index,
            self.id.short(),
            self.image_ref,
            self.world_position.x,
            self.world_position.y,
            self.world_position.z,
            self.zoom,
            if self.hovered { " hovered" } else { "" },
            if self.selected { " selected" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediawall_input::PointerEvent;
    use mediawall_kernel::{MemoryRouter, WallConfig};
    use mediawall_layout::WallLayout;

    fn wall() -> Wall {
        Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new())
    }

    #[test]
    fn summary_of_fresh_wall() {
        let w = wall();
        let summary = WallInspector::summary(&w);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.items, 9);
        assert!(summary.selected.is_none());
        assert!(summary.navigation.is_none());
        assert!(summary.distance_to_target < 1e-6);
    }

    #[test]
    fn summary_tracks_selection_and_hover() {
        let mut w = wall();
        let id = w.layout().items()[2].id;
        w.handle(PointerEvent::Enter(id));
        w.handle(PointerEvent::click(id));
        w.step(0.016);
        let summary = WallInspector::summary(&w);
        assert_eq!(summary.selected, Some(id));
        assert_eq!(summary.navigation, Some(id.to_string()));
        assert_eq!(summary.hovered, vec![2]);
        assert!(summary.distance_to_target > 0.0);
        let text = summary.to_string();
        assert!(text.contains(&id.short()));
        assert!(text.contains("hovered=[2]"));
    }

    #[test]
    fn inspect_known_item() {
        let w = wall();
        let id = w.layout().items()[0].id;
        let info = WallInspector::inspect_item(&w, id).unwrap();
        assert_eq!(info.index, 0);
        assert_eq!(info.image_ref, "/assets/1.jpg");
        assert!((info.world_position.y + 0.5).abs() < 1e-6);
        assert!(!info.selected);
        assert!(info.to_string().starts_with("Item [0]"));
    }

    #[test]
    fn inspect_unknown_item() {
        let w = wall();
        let stranger = mediawall_common::identify("/elsewhere.jpg", 99);
        assert!(WallInspector::inspect_item(&w, stranger).is_none());
    }
}
