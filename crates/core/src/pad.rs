//! Paged grid of game keys. Key 0 pages back, the last key pages forward,
//! the keys in between show one game each.

use crate::{
    catalog::CatalogEntry,
    feedback::{KeyFace, Slot},
    filters::FilterSet,
};

pub const DEFAULT_TOTAL_KEYS: usize = 8;
/// Back + Next + at least one game.
pub const MIN_TOTAL_KEYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Back,
    Next,
    /// Index into the pad's view (may be past its end).
    Game(usize),
    /// Button index outside the grid.
    Outside,
}

/// Page position, layout and filtered view shared by every pad key.
#[derive(Debug, Clone)]
pub struct PadState {
    page_index: usize,
    total_keys: usize,
    filters: FilterSet,
    view: Vec<CatalogEntry>,
}

impl Default for PadState {
    fn default() -> Self {
        Self {
            page_index: 0,
            total_keys: DEFAULT_TOTAL_KEYS,
            filters: FilterSet::default(),
            view: Vec::new(),
        }
    }
}

impl PadState {
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn total_keys(&self) -> usize {
        self.total_keys
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn view(&self) -> &[CatalogEntry] {
        &self.view
    }

    pub fn set_total_keys(&mut self, total: usize) {
        self.total_keys = total.max(MIN_TOTAL_KEYS);
        self.clamp_page();
    }

    pub fn set_page_index(&mut self, page: usize) {
        self.page_index = page;
        self.clamp_page();
    }

    pub fn set_filters(&mut self, filters: FilterSet) -> bool {
        if self.filters == filters {
            return false;
        }
        self.filters = filters;
        true
    }

    pub fn project(&mut self, catalog: &[CatalogEntry]) {
        self.view = self.filters.apply(catalog);
        self.clamp_page();
    }

    pub fn games_per_page(&self) -> usize {
        self.total_keys - 2
    }

    fn last_page(&self) -> usize {
        self.view.len().saturating_sub(1) / self.games_per_page()
    }

    fn clamp_page(&mut self) {
        self.page_index = self.page_index.min(self.last_page());
    }

    pub fn has_next_page(&self) -> bool {
        (self.page_index + 1) * self.games_per_page() < self.view.len()
    }

    pub fn role(&self, button_index: usize) -> KeyRole {
        if button_index == 0 {
            KeyRole::Back
        } else if button_index == self.total_keys - 1 {
            KeyRole::Next
        } else if button_index < self.total_keys {
            KeyRole::Game(self.page_index * self.games_per_page() + (button_index - 1))
        } else {
            KeyRole::Outside
        }
    }

    /// Returns true if the page changed.
    pub fn page_back(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Returns true if the page changed.
    pub fn page_forward(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn game_for(&self, button_index: usize) -> Option<&CatalogEntry> {
        match self.role(button_index) {
            KeyRole::Game(i) => self.view.get(i),
            _ => None,
        }
    }

    pub fn face(&self, button_index: usize) -> KeyFace {
        match self.role(button_index) {
            KeyRole::Back => KeyFace::Back {
                enabled: self.page_index > 0,
            },
            KeyRole::Next => KeyFace::Next {
                enabled: self.has_next_page(),
            },
            KeyRole::Game(i) => self
                .view
                .get(i)
                .map(|e| KeyFace::Game(Slot::from(e)))
                .unwrap_or(KeyFace::Blank),
            KeyRole::Outside => KeyFace::Blank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games(n: usize) -> Vec<CatalogEntry> {
        (0..n)
            .map(|i| CatalogEntry {
                id: i.to_string(),
                name: format!("g{i}"),
                category: "Game".into(),
                icon_path: "ph".into(),
            })
            .collect()
    }

    #[test]
    fn roles_on_default_layout() {
        let mut pad = PadState::default();
        pad.project(&games(10));

        assert_eq!(pad.games_per_page(), 6);
        assert_eq!(pad.role(0), KeyRole::Back);
        assert_eq!(pad.role(7), KeyRole::Next);
        assert_eq!(pad.role(1), KeyRole::Game(0));
        assert_eq!(pad.role(6), KeyRole::Game(5));
        assert_eq!(pad.role(8), KeyRole::Outside);
        assert_eq!(pad.face(0), KeyFace::Back { enabled: false });
        assert_eq!(pad.face(7), KeyFace::Next { enabled: true });
    }

    #[test]
    fn paging_stops_at_ends() {
        let mut pad = PadState::default();
        pad.project(&games(10));

        assert!(!pad.page_back());
        assert!(pad.page_forward());
        assert_eq!(pad.game_for(1).map(|e| e.id.as_str()), Some("6"));
        assert_eq!(pad.game_for(5), None);
        assert_eq!(pad.face(5), KeyFace::Blank);
        assert!(!pad.page_forward());
        assert!(pad.page_back());
        assert_eq!(pad.page_index(), 0);
    }

    #[test]
    fn shrinking_view_clamps_page() {
        let mut pad = PadState::default();
        pad.project(&games(20));
        pad.set_page_index(3);
        assert_eq!(pad.page_index(), 3);

        pad.project(&games(7));
        assert_eq!(pad.page_index(), 1);

        pad.project(&[]);
        assert_eq!(pad.page_index(), 0);
    }

    #[test]
    fn tiny_layout_is_clamped() {
        let mut pad = PadState::default();
        pad.set_total_keys(1);
        assert_eq!(pad.total_keys(), MIN_TOTAL_KEYS);
        assert_eq!(pad.games_per_page(), 1);
    }
}
