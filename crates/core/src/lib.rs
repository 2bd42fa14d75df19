//! Core library for the Steam game dial: catalog discovery and per-control state.
//!
//! This crate is UI-agnostic and plugin-agnostic. It exposes:
//! - `steam`: library roots, installed-app scan, appinfo extractor adapter, icon lookup.
//! - `catalog`: the joined, display-ready game list.
//! - `coordinator`: per-control state machine, dial sessions and the button pad.
//! - `core_log::CoreLog`: thin logging trait the host (plugin/CLI) can implement.
//!
//! Import the `prelude` if you want the most common types in scope.

pub mod core_log;
mod serde_helpers;

pub mod catalog;
pub mod coordinator;
pub mod feedback;
pub mod filters;
pub mod host;
pub mod launcher;
pub mod pad;
pub mod phase;
pub mod session;
pub mod settings;
pub mod steam;

/// Convenient re-exports for downstream users (plugin/CLI/tests).
pub use core_log::CoreLog;

pub mod prelude {
    pub use crate::core_log::{CoreLog, LogLevel, NoopLog};

    // Catalog pipeline
    pub use crate::catalog::{Catalog, CatalogEntry, build_catalog, load_catalog};
    pub use crate::steam::appinfo::{
        AppMetadataRecord, ExtractorError, MetadataExtractor, ProcessExtractor, appinfo_path,
        parse_extractor_output,
    };
    pub use crate::steam::icon::IconResolver;
    pub use crate::steam::library::library_paths;
    pub use crate::steam::manifest::{InstalledGame, scan_installed_games};

    // Control state
    pub use crate::coordinator::{CatalogSnapshot, Coordinator, InitTicket};
    pub use crate::feedback::{ControlKind, DisplaySurface, Feedback, KeyFace, Slot};
    pub use crate::filters::{DEFAULT_FILTERS, FilterSet};
    pub use crate::host::{ControlHost, SettingsStore};
    pub use crate::launcher::{GameLauncher, SteamUriLauncher};
    pub use crate::pad::PadState;
    pub use crate::phase::ControlPhase;
    pub use crate::session::SessionState;
    pub use crate::settings::{ControlSettings, effective_install_dir};
}
