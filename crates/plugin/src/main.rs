use std::{process::exit, sync::Arc};

use steamscroll_core::prelude::{
    CoreLog, Coordinator, IconResolver, ProcessExtractor, SteamUriLauncher,
};
use streamdeck_lib::prelude::*;

use crate::{
    actions::{steam_pad::SteamPadAction, steam_scroll::SteamScrollAction},
    adapters::control_worker::ControlWorkerAdapter,
    state::settings_cache::SettingsCache,
    util::core_log::PluginCoreLog,
};

mod actions;
mod adapters;
mod state;
mod topics;
mod util;

const PLUGIN_ID: &str = "com.zstefanovic.steamscroll";

fn main() {
    let logger: Arc<dyn ActionLog> = match FileLogger::from_appdata(PLUGIN_ID) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            eprintln!("Failed to create logger: {e}");
            exit(1);
        }
    };

    let args = match parse_launch_args() {
        Ok(args) => args,
        Err(e) => {
            error!(logger, "Failed to parse launch args: {e}");
            exit(2);
        }
    };

    let resource_dir = match util::resource_dir::get_resource_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!(logger, "Failed to get resource dir: {e}");
            exit(3);
        }
    };

    let core_log: Arc<dyn CoreLog> = Arc::new(PluginCoreLog(logger.clone()));
    let extractor = ProcessExtractor::bundled(&resource_dir);
    info!(logger, "Using extractor {}", extractor.exe().display());

    let coordinator = Coordinator::new(
        Arc::new(extractor),
        Arc::new(SteamUriLauncher),
        IconResolver::bundled(&resource_dir),
        core_log,
    );

    // Steam (re)starting usually means installs changed
    let hooks = AppHooks::default().append(|cx, ev| {
        use streamdeck_lib::prelude::HookEvent::*;
        match ev {
            ApplicationDidLaunch { .. } => {
                cx.bus().publish_t(topics::CATALOG_RESCAN, ());
            }
            _ => {
                debug!(cx.log(), "HookEvent: {:?}", ev);
            }
        }
    });

    let plugin = match PluginBuilder::new()
        .set_hooks(hooks)
        .add_extension(Arc::new(coordinator))
        .add_extension(Arc::new(SettingsCache::default()))
        .add_adapter(ControlWorkerAdapter::new())
        .add_action(ActionFactory::default_of::<SteamScrollAction>())
        .add_action(ActionFactory::default_of::<SteamPadAction>())
        .build()
    {
        Ok(p) => p,
        Err(e) => {
            error!(logger, "Failed to build plugin: {e}");
            exit(4);
        }
    };

    let cfg = RunConfig::default().set_log_websocket(false);

    match run(plugin, args, logger.clone(), cfg) {
        Ok(_) => {
            info!(logger, "Plugin exited successfully.");
        }
        Err(e) => {
            error!(logger, "Plugin run failed: {e}");
            exit(5);
        }
    }
}
