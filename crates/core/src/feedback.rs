use serde::Serialize;

use crate::catalog::CatalogEntry;

/// What kind of physical control a context is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlKind {
    /// Rotating dial with a three-slot wheel.
    Dial,
    /// One key of the paged button grid.
    PadKey,
}

/// Name + icon shown for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub title: String,
    pub icon: String,
}

impl From<&CatalogEntry> for Slot {
    fn from(e: &CatalogEntry) -> Self {
        Self {
            title: e.name.clone(),
            icon: e.icon_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum KeyFace {
    Back { enabled: bool },
    Next { enabled: bool },
    Game(Slot),
    Blank,
}

/// Everything the core ever asks a control to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Feedback {
    /// Nothing to show (yet): single label, no icons.
    Loading,
    /// `appinfo.vdf` is missing under the configured directory.
    BadDirectory,
    Wheel { prev: Slot, current: Slot, next: Slot },
    Key(KeyFace),
}

/// Sink for control feedback; the plugin maps it to Stream Deck layouts.
pub trait DisplaySurface {
    fn render(&self, control_id: &str, kind: ControlKind, feedback: &Feedback);
}
