use mediawall_common::ItemId;
use mediawall_layout::WallLayout;

/// The single focus concept of the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(ItemId),
}

impl SelectionState {
    pub fn selected(&self) -> Option<ItemId> {
        match self {
            Self::Unselected => None,
            Self::Selected(id) => Some(*id),
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        *self == Self::Selected(id)
    }

    /// Clicking the focused item releases it; clicking anything else focuses
    /// it directly, with no unselected step in between.
    pub fn on_click(self, id: ItemId) -> Self {
        match self {
            Self::Selected(current) if current == id => Self::Unselected,
            _ => Self::Selected(id),
        }
    }

    pub fn on_miss(self) -> Self {
        Self::Unselected
    }
}

/// What triggered a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCause {
    Click,
    Miss,
    Navigation,
}

/// Record of every selection change, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected {
        id: ItemId,
        previous: Option<ItemId>,
        cause: SelectionCause,
    },
    Deselected {
        previous: ItemId,
        cause: SelectionCause,
    },
}

/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Selection state plus its change log.
///
/// Membership is checked against the layout on every transition, so the
/// selected id always names a wall item.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    events: Vec<SelectionEvent>,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.state.selected()
    }

    pub fn events(&self) -> &[SelectionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Click on an item. A stale id that is not on the wall counts as a miss.
    /// Returns true if the state changed.
    pub fn click_item(&mut self, id: ItemId, layout: &WallLayout) -> bool {
        if !layout.contains(id) {
            tracing::warn!(id = %id, "click on unknown item treated as miss");
            return self.apply(self.state.on_miss(), SelectionCause::Miss);
        }
        self.apply(self.state.on_click(id), SelectionCause::Click)
    }

    /// Click outside every item.
    pub fn click_miss(&mut self) -> bool {
        self.apply(self.state.on_miss(), SelectionCause::Miss)
    }

    /// Take the externally observed focus as authoritative. Unknown ids
    /// resolve to `Unselected`.
    pub fn adopt(&mut self, target: Option<ItemId>, layout: &WallLayout) -> bool {
        let next = match target {
            Some(id) if layout.contains(id) => SelectionState::Selected(id),
            Some(id) => {
                tracing::warn!(id = %id, "navigation names unknown item; showing overview");
                SelectionState::Unselected
            }
            None => SelectionState::Unselected,
        };
        self.apply(next, SelectionCause::Navigation)
    }

    fn apply(&mut self, next: SelectionState, cause: SelectionCause) -> bool {
        let previous = self.state.selected();
        if next == self.state {
            return false;
        }
        self.state = next;
        let event = match next {
            SelectionState::Selected(id) => SelectionEvent::Selected {
                id,
                previous,
                cause,
            },
            SelectionState::Unselected => match previous {
                Some(previous) => SelectionEvent::Deselected { previous, cause },
                None => return true,
            },
        };
        tracing::debug!(?event, "selection changed");
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
        true
    }
}
