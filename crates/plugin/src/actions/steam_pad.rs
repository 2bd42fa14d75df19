use constcat::concat;
use steamscroll_core::prelude::{ControlKind, Coordinator};
use streamdeck_lib::prelude::*;

use crate::{
    PLUGIN_ID,
    actions::{control_did_receive_settings, control_will_appear, control_will_disappear, sd_host},
};

/// One key of the paged game grid: Back, Next, or a game slot depending on `buttonIndex`.
#[derive(Default)]
pub struct SteamPadAction;

impl ActionStatic for SteamPadAction {
    const ID: &'static str = concat!(PLUGIN_ID, ".buttons");
}

impl Action for SteamPadAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn init(&mut self, cx: &Context, ctx: &str) {
        info!(cx.log(), "SteamPadAction init for {}", ctx);
    }

    fn will_appear(&mut self, cx: &Context, ev: &WillAppear) {
        control_will_appear(cx, ev.context, ev.settings, ControlKind::PadKey);
    }

    fn will_disappear(&mut self, cx: &Context, ev: &WillDisappear) {
        control_will_disappear(cx, ev.context);
    }

    fn did_receive_settings(&mut self, cx: &Context, ev: &DidReceiveSettings) {
        control_did_receive_settings(cx, ev.context, ev.settings);
    }

    fn key_down(&mut self, cx: &Context, ev: &KeyDown) {
        let (Some(coordinator), Some(host)) = (cx.try_ext::<Coordinator>(), sd_host(cx)) else {
            cx.sd().show_alert(ev.context);
            return;
        };
        coordinator.press(ev.context, &host);
    }

    fn key_up(&mut self, _cx: &Context, _ev: &KeyUp) {}
}
