use constcat::concat;
use steamscroll_core::prelude::{ControlKind, Coordinator};
use streamdeck_lib::prelude::*;

use crate::{
    PLUGIN_ID,
    actions::{control_did_receive_settings, control_will_appear, control_will_disappear, sd_host},
};

/// Dial that scrolls through the filtered game list and launches on press.
#[derive(Default)]
pub struct SteamScrollAction;

impl ActionStatic for SteamScrollAction {
    const ID: &'static str = concat!(PLUGIN_ID, ".dial");
}

impl Action for SteamScrollAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn init(&mut self, cx: &Context, ctx: &str) {
        info!(cx.log(), "SteamScrollAction init for {}", ctx);
    }

    fn will_appear(&mut self, cx: &Context, ev: &WillAppear) {
        control_will_appear(cx, ev.context, ev.settings, ControlKind::Dial);
    }

    fn will_disappear(&mut self, cx: &Context, ev: &WillDisappear) {
        control_will_disappear(cx, ev.context);
    }

    fn did_receive_settings(&mut self, cx: &Context, ev: &DidReceiveSettings) {
        control_did_receive_settings(cx, ev.context, ev.settings);
    }

    fn dial_rotate(&mut self, cx: &Context, ev: &DialRotate) {
        let (Some(coordinator), Some(host)) = (cx.try_ext::<Coordinator>(), sd_host(cx)) else {
            cx.sd().show_alert(ev.context);
            return;
        };
        coordinator.rotate(ev.context, i64::from(ev.ticks), &host);
    }

    fn dial_down(&mut self, cx: &Context, ev: &DialDown) {
        let (Some(coordinator), Some(host)) = (cx.try_ext::<Coordinator>(), sd_host(cx)) else {
            cx.sd().show_alert(ev.context);
            return;
        };
        coordinator.press(ev.context, &host);
    }
}
