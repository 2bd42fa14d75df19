use serde_json::{Value, json};
use steamscroll_core::prelude::{
    ControlKind, ControlSettings, DisplaySurface, Feedback, KeyFace, SettingsStore,
};
use streamdeck_lib::prelude::*;

use crate::state::settings_cache::SettingsCache;

pub const BACK_ICON: &str = "imgs/back_icon.png";
pub const NEXT_ICON: &str = "imgs/next_icon.png";

const LOADING_TITLE: &str = "Loading..";
const BAD_DIR_TITLE: &str = "Bad Steam Dir";

/// Bridges the coordinator's [`ControlHost`] seam onto the Stream Deck connection.
#[derive(Clone)]
pub struct SdHost {
    cx: Context,
    cache: SettingsCache,
}

impl SdHost {
    pub fn new(cx: Context, cache: SettingsCache) -> Self {
        Self { cx, cache }
    }
}

impl SettingsStore for SdHost {
    fn load(&self, control_id: &str) -> ControlSettings {
        self.cache.get(control_id)
    }

    fn save(&self, control_id: &str, settings: &ControlSettings) {
        self.cache.put(control_id, settings.clone());
        self.cx.sd().set_settings(control_id, settings.to_value());
    }
}

impl DisplaySurface for SdHost {
    fn render(&self, control_id: &str, kind: ControlKind, feedback: &Feedback) {
        match kind {
            ControlKind::Dial => match dial_payload(feedback) {
                Some(payload) => self.cx.sd().set_feedback(control_id, payload),
                None => debug!(self.cx.log(), "no dial layout for {:?}", feedback),
            },
            ControlKind::PadKey => {
                let (image, title) = key_face(feedback);
                self.cx.sd().set_image(control_id, image, None, None);
                self.cx.sd().set_title(control_id, Some(title), None, None);
            }
        }
    }
}

/// `setFeedback` payload for the dial layout.
pub fn dial_payload(feedback: &Feedback) -> Option<Value> {
    match feedback {
        Feedback::Loading => Some(json!({
            "currentGameTitle": { "value": LOADING_TITLE },
        })),
        Feedback::BadDirectory => Some(json!({
            "currentGameIcon": { "value": "" },
            "currentGameTitle": { "value": BAD_DIR_TITLE },
        })),
        Feedback::Wheel { prev, current, next } => Some(json!({
            "prevGameIcon": { "value": prev.icon },
            "prevGameTitle": { "value": prev.title },
            "currentGameIcon": { "value": current.icon },
            "currentGameTitle": { "value": current.title },
            "nextGameIcon": { "value": next.icon },
            "nextGameTitle": { "value": next.title },
        })),
        Feedback::Key(_) => None,
    }
}

/// Image and title for a pad key. `None` restores the manifest image.
pub fn key_face(feedback: &Feedback) -> (Option<String>, String) {
    match feedback {
        Feedback::Loading => (None, LOADING_TITLE.to_string()),
        Feedback::BadDirectory => (None, BAD_DIR_TITLE.to_string()),
        Feedback::Wheel { current, .. } => (Some(current.icon.clone()), current.title.clone()),
        Feedback::Key(face) => match face {
            KeyFace::Back { enabled } => (enabled.then(|| BACK_ICON.to_string()), String::new()),
            KeyFace::Next { enabled } => (enabled.then(|| NEXT_ICON.to_string()), String::new()),
            KeyFace::Game(slot) => (Some(slot.icon.clone()), slot.title.clone()),
            KeyFace::Blank => (None, String::new()),
        },
    }
}
