use crate::{
    catalog::CatalogEntry,
    feedback::{Feedback, Slot},
    filters::FilterSet,
};

/// Scroll position and filtered view of one dial.
#[derive(Debug, Clone)]
pub struct SessionState {
    control_id: String,
    filters: FilterSet,
    scroll_index: usize,
    view: Vec<CatalogEntry>,
}

impl SessionState {
    /// Starts with an empty view; call [`SessionState::project`] with a catalog.
    pub fn new(control_id: impl Into<String>, filters: FilterSet, scroll_index: usize) -> Self {
        Self {
            control_id: control_id.into(),
            filters,
            scroll_index,
            view: Vec::new(),
        }
    }

    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn view(&self) -> &[CatalogEntry] {
        &self.view
    }

    /// Always `< view.len()` once the view is non-empty.
    pub fn scroll_index(&self) -> usize {
        self.scroll_index
    }

    /// Returns true when the filters actually changed.
    pub fn set_filters(&mut self, filters: FilterSet) -> bool {
        if self.filters == filters {
            return false;
        }
        self.filters = filters;
        true
    }

    pub fn set_scroll_index(&mut self, index: usize) {
        self.scroll_index = index;
        self.wrap();
    }

    /// Rebuild the view from `catalog`.
    pub fn project(&mut self, catalog: &[CatalogEntry]) {
        self.view = self.filters.apply(catalog);
        self.wrap();
    }

    fn wrap(&mut self) {
        if !self.view.is_empty() {
            self.scroll_index %= self.view.len();
        }
    }

    /// Move one entry per event: positive ticks go to the previous entry,
    /// negative to the next. Returns the new index, or `None` if nothing moved.
    pub fn rotate(&mut self, ticks: i64) -> Option<usize> {
        let n = self.view.len();
        if n == 0 || ticks == 0 {
            return None;
        }
        self.scroll_index = if ticks > 0 {
            (self.scroll_index + n - 1) % n
        } else {
            (self.scroll_index + 1) % n
        };
        Some(self.scroll_index)
    }

    pub fn current(&self) -> Option<&CatalogEntry> {
        self.view.get(self.scroll_index)
    }

    /// Previous / current / next slots, or [`Feedback::Loading`] for an empty view.
    pub fn feedback(&self) -> Feedback {
        let n = self.view.len();
        if n == 0 {
            return Feedback::Loading;
        }
        let i = self.scroll_index % n;
        Feedback::Wheel {
            prev: Slot::from(&self.view[(i + n - 1) % n]),
            current: Slot::from(&self.view[i]),
            next: Slot::from(&self.view[(i + 1) % n]),
        }
    }
}
