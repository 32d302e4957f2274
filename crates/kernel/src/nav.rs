use std::fmt;

/// External navigation collaborator: holds the optional "current focus
/// identifier" the wall reads on load and writes on interaction.
///
/// `navigate` must take effect before the next `current` call, the way a
/// router's location setter does.
pub trait Navigator {
    /// Focus identifier currently named by navigation state, if any.
    fn current(&self) -> Option<String>;

    /// Set the focus identifier, or clear it with `None`.
    fn navigate(&mut self, target: Option<&str>);
}

/// Router path for the wall: `/` or `/item/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Overview,
    Item(String),
}

const ITEM_PREFIX: &str = "/item/";

impl Route {
    /// Parse a path. Anything that is not an item route is the overview.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        match path.strip_prefix(ITEM_PREFIX) {
            Some(rest) => {
                let id = rest.trim_end_matches('/');
                if id.is_empty() || id.contains('/') {
                    Self::Overview
                } else {
                    Self::Item(id.to_string())
                }
            }
            None => Self::Overview,
        }
    }

    pub fn for_target(target: Option<&str>) -> Self {
        match target {
            Some(id) if !id.is_empty() => Self::Item(id.to_string()),
            _ => Self::Overview,
        }
    }

    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::Overview => None,
            Self::Item(id) => Some(id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overview => write!(f, "/"),
            Self::Item(id) => write!(f, "{ITEM_PREFIX}{id}"),
        }
    }
}

/// Routes retained by [`MemoryRouter`]; the oldest entries fall off first.
pub const MAX_HISTORY: usize = 64;

/// In-memory router with browser-style back/forward history.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    history: Vec<Route>,
    cursor: usize,
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self {
            history: vec![Route::Overview],
            cursor: 0,
        }
    }
}

impl MemoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(path: &str) -> Self {
        Self {
            history: vec![Route::parse(path)],
            cursor: 0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.history[self.cursor]
    }

    pub fn path(&self) -> String {
        self.route().to_string()
    }

    /// Push a path; forward history is dropped. Pushing the current route is a no-op.
    pub fn push_path(&mut self, path: &str) {
        self.push(Route::parse(path));
    }

    pub fn push(&mut self, route: Route) {
        if *self.route() == route {
            return;
        }
        self.history.truncate(self.cursor + 1);
        self.history.push(route);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        } else {
            self.cursor += 1;
        }
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Navigator for MemoryRouter {
    fn current(&self) -> Option<String> {
        self.route().item_id().map(str::to_string)
    }

    fn navigate(&mut self, target: Option<&str>) {
        let route = Route::for_target(target);
        tracing::debug!(path = %route, "navigate");
        self.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_routes() {
        assert_eq!(Route::parse("/"), Route::Overview);
        assert_eq!(Route::parse(""), Route::Overview);
        assert_eq!(Route::parse("/item/abc"), Route::Item("abc".into()));
        assert_eq!(Route::parse("/item/abc/"), Route::Item("abc".into()));
        assert_eq!(Route::parse("/item/"), Route::Overview);
        assert_eq!(Route::parse("/item/a/b"), Route::Overview);
        assert_eq!(Route::parse("/elsewhere"), Route::Overview);
    }

    #[test]
    fn display_round_trips() {
        for path in ["/", "/item/xyz"] {
            assert_eq!(Route::parse(path).to_string(), path);
        }
    }

    #[test]
    fn router_navigate_and_history() {
        let mut r = MemoryRouter::new();
        assert_eq!(r.current(), None);
        r.navigate(Some("a"));
        assert_eq!(r.current().as_deref(), Some("a"));
        assert_eq!(r.path(), "/item/a");
        r.navigate(None);
        assert_eq!(r.path(), "/");
        assert!(r.back());
        assert_eq!(r.current().as_deref(), Some("a"));
        assert!(r.forward());
        assert_eq!(r.current(), None);
        assert!(!r.forward());
    }

    #[test]
    fn push_drops_forward_history() {
        let mut r = MemoryRouter::new();
        r.push_path("/item/a");
        r.push_path("/item/b");
        r.back();
        r.push_path("/item/c");
        assert_eq!(r.history_len(), 3);
        assert!(!r.forward());
    }

    #[test]
    fn history_is_bounded() {
        let mut r = MemoryRouter::new();
        for i in 0..MAX_HISTORY * 2 {
            r.navigate(Some(&format!("id{i}")));
        }
        assert_eq!(r.history_len(), MAX_HISTORY);
        assert_eq!(r.path(), format!("/item/id{}", MAX_HISTORY * 2 - 1));
        let mut steps = 0;
        while r.back() {
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY - 1);
        assert_eq!(r.path(), format!("/item/id{MAX_HISTORY}"));
    }

    #[test]
    fn pushing_current_route_is_noop() {
        let mut r = MemoryRouter::with_path("/item/a");
        r.navigate(Some("a"));
        assert_eq!(r.history_len(), 1);
    }
}
