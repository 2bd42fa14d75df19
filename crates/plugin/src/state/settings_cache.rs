use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use steamscroll_core::prelude::ControlSettings;

/// Last known settings per Stream Deck context.
///
/// Filled from `willAppear`/`didReceiveSettings` payloads and from our own
/// write-backs, so the worker thread never has to ask the host.
#[derive(Clone, Default)]
pub struct SettingsCache(Arc<DashMap<String, ControlSettings>>);

impl SettingsCache {
    pub fn get(&self, ctx: &str) -> ControlSettings {
        self.0.get(ctx).map(|s| s.clone()).unwrap_or_default()
    }

    pub fn put(&self, ctx: &str, settings: ControlSettings) {
        self.0.insert(ctx.to_string(), settings);
    }

    /// Parse and store a raw payload. An unparseable payload leaves the cached entry alone.
    pub fn put_raw(&self, ctx: &str, raw: &Map<String, Value>) -> Result<ControlSettings, String> {
        match ControlSettings::from_map(raw) {
            Ok(settings) => {
                self.put(ctx, settings.clone());
                Ok(settings)
            }
            Err(e) => Err(format!("bad settings for {ctx}: {e}")),
        }
    }

    pub fn remove(&self, ctx: &str) {
        self.0.remove(ctx);
    }
}
