use mediawall_common::ItemId;

/// A discrete interaction delivered by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer moved onto an item's hit region.
    Enter(ItemId),
    /// Pointer left an item's hit region.
    Leave(ItemId),
    /// Click on an item, or `None` when nothing was hit.
    Click(Option<ItemId>),
}

impl PointerEvent {
    pub fn click(id: ItemId) -> Self {
        Self::Click(Some(id))
    }

    pub fn miss() -> Self {
        Self::Click(None)
    }
}

/// Turns "what is under the pointer now" into enter/leave pairs.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    current: Option<ItemId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ItemId> {
        self.current
    }

    /// Feed the latest hover target; returns the events to deliver, leave first.
    pub fn update(&mut self, under_pointer: Option<ItemId>) -> Vec<PointerEvent> {
        if under_pointer == self.current {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(old) = self.current {
            events.push(PointerEvent::Leave(old));
        }
        if let Some(new) = under_pointer {
            events.push(PointerEvent::Enter(new));
        }
        self.current = under_pointer;
        events
    }

    /// Pointer left the surface entirely.
    pub fn clear(&mut self) -> Vec<PointerEvent> {
        self.update(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediawall_common::identify;

    #[test]
    fn click_constructors() {
        let id = identify("a.jpg", 0);
        assert_eq!(PointerEvent::click(id), PointerEvent::Click(Some(id)));
        assert_eq!(PointerEvent::miss(), PointerEvent::Click(None));
    }

    #[test]
    fn tracker_emits_enter_then_nothing() {
        let id = identify("a.jpg", 0);
        let mut t = HoverTracker::new();
        assert_eq!(t.update(Some(id)), vec![PointerEvent::Enter(id)]);
        assert!(t.update(Some(id)).is_empty());
        assert_eq!(t.current(), Some(id));
    }

    #[test]
    fn tracker_switches_leave_first() {
        let a = identify("a.jpg", 0);
        let b = identify("b.jpg", 1);
        let mut t = HoverTracker::new();
        t.update(Some(a));
        assert_eq!(
            t.update(Some(b)),
            vec![PointerEvent::Leave(a), PointerEvent::Enter(b)]
        );
        assert_eq!(t.clear(), vec![PointerEvent::Leave(b)]);
        assert!(t.clear().is_empty());
    }
}
