use steamscroll_core::prelude::{ControlSettings, InitTicket};
use streamdeck_lib::prelude::*;

// Control lifecycle (handled by ControlWorkerAdapter)
pub const CONTROL_INIT: TopicId<InitTicket> = TopicId::new("steamscroll.control.init");

pub const SETTINGS_CHANGED: TopicId<SettingsChanged> =
    TopicId::new("steamscroll.control.settings-changed");

#[derive(Debug, Clone)]
pub struct SettingsChanged {
    pub ctx_id: String,
    pub settings: ControlSettings,
}

// Rebuild the catalog for the current install dir
pub const CATALOG_RESCAN: TopicId<()> = TopicId::new("steamscroll.catalog.rescan");

// Control went away; its work lane can be dropped
pub const CONTROL_REMOVED: TopicId<ControlRemoved> =
    TopicId::new("steamscroll.control.removed");

#[derive(Debug, Clone)]
pub struct ControlRemoved {
    pub ctx_id: String,
}
