use crate::{feedback::DisplaySurface, settings::ControlSettings};

/// Per-control persisted settings.
pub trait SettingsStore {
    fn load(&self, control_id: &str) -> ControlSettings;
    fn save(&self, control_id: &str, settings: &ControlSettings);
}

/// Everything the coordinator needs from the host connection for one call.
pub trait ControlHost: DisplaySurface + SettingsStore {}

impl<T: DisplaySurface + SettingsStore> ControlHost for T {}
