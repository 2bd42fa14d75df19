use crossbeam_channel::{Receiver as CbReceiver, bounded, select};
use std::sync::Arc;
use steamscroll_core::prelude::{ControlSettings, Coordinator, InitTicket};
use streamdeck_lib::prelude::*;

use crate::{
    adapters::lanes::Lanes,
    state::settings_cache::SettingsCache,
    topics::{CATALOG_RESCAN, CONTROL_INIT, CONTROL_REMOVED, SETTINGS_CHANGED},
    util::sd_host::SdHost,
};

/// Lane for rescans; context ids never collide with it.
const CATALOG_LANE: &str = "#catalog";

enum Job {
    Init(InitTicket),
    Settings(ControlSettings),
    Rescan,
}

/// Runs everything that touches the filesystem or the extractor:
/// control initialization, settings-driven reloads and rescans.
///
/// Each control gets its own lane, so a hung extractor in one control's
/// rebuild never delays another control's init or re-render.
pub struct ControlWorkerAdapter;

impl ControlWorkerAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl AdapterStatic for ControlWorkerAdapter {
    const NAME: &'static str = "steamscroll.control_worker";
}

impl Adapter for ControlWorkerAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn policy(&self) -> StartPolicy {
        StartPolicy::Eager
    }

    fn topics(&self) -> &'static [&'static str] {
        &[
            CONTROL_INIT.name,
            SETTINGS_CHANGED.name,
            CONTROL_REMOVED.name,
            CATALOG_RESCAN.name,
        ]
    }

    fn start(
        &self,
        cx: &Context,
        _bus: Arc<dyn Bus>,
        inbox: CbReceiver<Arc<ErasedTopic>>,
    ) -> AdapterResult {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let logger = cx.log().clone();
        let coordinator = cx.try_ext::<Coordinator>().ok_or(AdapterError::Init(
            "Coordinator extension missing".to_string(),
        ))?;
        let coordinator = Coordinator::clone(&coordinator);
        let cache = cx.try_ext::<SettingsCache>().ok_or(AdapterError::Init(
            "SettingsCache extension missing".to_string(),
        ))?;
        let host = SdHost::new(cx.clone(), SettingsCache::clone(&cache));

        let lane_logger = logger.clone();
        let mut lanes = Lanes::new(move |key: &str, job: Job| match job {
            Job::Init(ticket) => {
                debug!(lane_logger, "init {:?} {}", ticket.kind(), key);
                coordinator.finish_appear(ticket, &host);
            }
            Job::Settings(settings) => {
                debug!(lane_logger, "settings changed for {}", key);
                coordinator.settings_changed(key, settings, &host);
            }
            Job::Rescan => {
                debug!(lane_logger, "catalog rescan");
                coordinator.rescan(&host);
            }
        });

        let join = std::thread::spawn(move || {
            info!(logger, "ControlWorkerAdapter started");

            loop {
                select! {
                    recv(inbox) -> msg => match msg {
                        Ok(ev) => {
                            if let Some(ticket) = ev.downcast(CONTROL_INIT) {
                                lanes.dispatch(ticket.control_id(), Job::Init(ticket.clone()));
                            } else if let Some(m) = ev.downcast(SETTINGS_CHANGED) {
                                lanes.dispatch(&m.ctx_id, Job::Settings(m.settings.clone()));
                            } else if let Some(m) = ev.downcast(CONTROL_REMOVED) {
                                lanes.close(&m.ctx_id);
                            } else if ev.downcast(CATALOG_RESCAN).is_some() {
                                lanes.dispatch(CATALOG_LANE, Job::Rescan);
                            }
                        }
                        Err(e) => error!(logger, "recv error: {}", e),
                    },
                    recv(stop_rx) -> _ => break,
                }
            }

            debug!(logger, "closing {} lane(s)", lanes.lane_count());
            drop(lanes);
            info!(logger, "ControlWorkerAdapter stopped");
        });

        Ok(AdapterHandle::from_crossbeam(join, stop_tx))
    }
}
