use serde_json::{Map, Value};
use steamscroll_core::prelude::{ControlKind, Coordinator};
use streamdeck_lib::prelude::*;

use crate::{
    adapters::control_worker::ControlWorkerAdapter,
    state::settings_cache::SettingsCache,
    topics::{CONTROL_INIT, CONTROL_REMOVED, ControlRemoved, SETTINGS_CHANGED, SettingsChanged},
    util::sd_host::SdHost,
};

pub mod steam_pad;
pub mod steam_scroll;

/// Cache the appearance settings, claim the control and hand the slow part to the worker.
pub(crate) fn control_will_appear(
    cx: &Context,
    ctx_id: &str,
    settings: &Map<String, Value>,
    kind: ControlKind,
) {
    let (Some(coordinator), Some(cache)) = (cx.try_ext::<Coordinator>(), cx.try_ext::<SettingsCache>())
    else {
        error!(cx.log(), "extensions missing, cannot initialize {}", ctx_id);
        cx.sd().show_alert(ctx_id);
        return;
    };

    if let Err(e) = cache.put_raw(ctx_id, settings) {
        warn!(cx.log(), "{}", e);
    }

    // claimed here so a second willAppear racing the worker is dropped
    let Some(ticket) = coordinator.begin_appear(ctx_id, kind) else {
        return;
    };
    cx.bus()
        .adapters_notify_name_of::<ControlWorkerAdapter, _>(CONTROL_INIT, ticket);
}

pub(crate) fn control_did_receive_settings(
    cx: &Context,
    ctx_id: &str,
    settings: &Map<String, Value>,
) {
    let Some(cache) = cx.try_ext::<SettingsCache>() else {
        error!(cx.log(), "SettingsCache ext missing");
        return;
    };
    match cache.put_raw(ctx_id, settings) {
        Ok(settings) => cx.bus().adapters_notify_name_of::<ControlWorkerAdapter, _>(
            SETTINGS_CHANGED,
            SettingsChanged {
                ctx_id: ctx_id.to_string(),
                settings,
            },
        ),
        Err(e) => {
            warn!(cx.log(), "{}", e);
            cx.sd().show_alert(ctx_id);
        }
    }
}

pub(crate) fn control_will_disappear(cx: &Context, ctx_id: &str) {
    if let Some(coordinator) = cx.try_ext::<Coordinator>() {
        coordinator.control_removed(ctx_id);
    }
    if let Some(cache) = cx.try_ext::<SettingsCache>() {
        cache.remove(ctx_id);
    }
    cx.bus().adapters_notify_name_of::<ControlWorkerAdapter, _>(
        CONTROL_REMOVED,
        ControlRemoved {
            ctx_id: ctx_id.to_string(),
        },
    );
}

/// Host bridge for input handled on the action thread.
pub(crate) fn sd_host(cx: &Context) -> Option<SdHost> {
    let cache = cx.try_ext::<SettingsCache>()?;
    Some(SdHost::new(cx.clone(), SettingsCache::clone(&cache)))
}
