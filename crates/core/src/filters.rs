use std::collections::BTreeSet;

use crate::catalog::CatalogEntry;

/// Filter applied when a control has none configured.
pub const DEFAULT_FILTERS: [&str; 3] = ["game", "tool", "application"];

/// Lower-cased, trimmed category name.
pub fn normalize_category(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Set of normalized categories a control shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet(BTreeSet<String>);

impl Default for FilterSet {
    fn default() -> Self {
        Self(DEFAULT_FILTERS.iter().map(|s| s.to_string()).collect())
    }
}

impl FilterSet {
    /// Normalizes `options`; blank entries are dropped and an empty result
    /// falls back to [`DEFAULT_FILTERS`].
    pub fn from_options<S: AsRef<str>>(options: &[S]) -> Self {
        let set: BTreeSet<String> = options
            .iter()
            .map(|o| normalize_category(o.as_ref()))
            .filter(|o| !o.is_empty())
            .collect();
        if set.is_empty() {
            Self::default()
        } else {
            Self(set)
        }
    }

    /// True when `options` would fall back to the defaults.
    pub fn is_unset<S: AsRef<str>>(options: &[S]) -> bool {
        options.iter().all(|o| o.as_ref().trim().is_empty())
    }

    pub fn matches(&self, category: &str) -> bool {
        self.0.contains(&normalize_category(category))
    }

    /// Entries whose category passes, in catalog order.
    pub fn apply(&self, catalog: &[CatalogEntry]) -> Vec<CatalogEntry> {
        catalog
            .iter()
            .filter(|e| self.matches(&e.category))
            .cloned()
            .collect()
    }

    pub fn to_options(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}
