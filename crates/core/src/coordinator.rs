//! Owns the catalog and one state slot per visible control.
//!
//! Catalog work (filesystem + extractor) never runs under a lock; sessions
//! always re-read the latest snapshot right before projecting it.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::{
    CoreLog,
    catalog::{Catalog, CatalogEntry, load_catalog},
    feedback::{ControlKind, Feedback},
    filters::{DEFAULT_FILTERS, FilterSet},
    host::ControlHost,
    launcher::GameLauncher,
    pad::{KeyRole, PadState},
    phase::ControlPhase,
    session::SessionState,
    settings::ControlSettings,
    steam::{appinfo::MetadataExtractor, appinfo::appinfo_path, icon::IconResolver},
};

/// Catalog plus the install dir it was built from.
#[derive(Debug)]
pub struct CatalogSnapshot {
    pub install_dir: Option<PathBuf>,
    pub entries: Catalog,
    /// Rebuild number; a slower, older rebuild never replaces a newer one.
    pub generation: u64,
}

impl CatalogSnapshot {
    fn empty() -> Self {
        Self {
            install_dir: None,
            entries: Arc::from(Vec::new()),
            generation: 0,
        }
    }
}

/// Proof that a control was moved to `Initializing`.
/// Hand it to [`Coordinator::finish_appear`], possibly on another thread.
/// A ticket that no longer matches the control's slot is ignored.
#[derive(Debug, Clone)]
pub struct InitTicket {
    control_id: String,
    kind: ControlKind,
    ticket: u64,
}

impl InitTicket {
    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }
}

struct ControlSlot {
    kind: ControlKind,
    phase: ControlPhase,
    ticket: u64,
    settings: ControlSettings,
    /// Dials only.
    session: Option<SessionState>,
    /// Pad keys only.
    button_index: usize,
    /// Latest settings that arrived while initializing; applied once settled.
    pending: Option<ControlSettings>,
}

impl ControlSlot {
    fn new(kind: ControlKind) -> Self {
        Self {
            kind,
            phase: ControlPhase::Uninitialized,
            ticket: 0,
            settings: ControlSettings::default(),
            session: None,
            button_index: 0,
            pending: None,
        }
    }
}

type Render = (String, ControlKind, Feedback);

struct Inner {
    extractor: Arc<dyn MetadataExtractor>,
    launcher: Arc<dyn GameLauncher>,
    icons: IconResolver,
    logger: Arc<dyn CoreLog>,
    catalog: ArcSwap<CatalogSnapshot>,
    generation: AtomicU64,
    next_ticket: AtomicU64,
    controls: Mutex<HashMap<String, ControlSlot>>,
    pad: Mutex<PadState>,
}

#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    pub fn new(
        extractor: Arc<dyn MetadataExtractor>,
        launcher: Arc<dyn GameLauncher>,
        icons: IconResolver,
        logger: Arc<dyn CoreLog>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                extractor,
                launcher,
                icons,
                logger,
                catalog: ArcSwap::from_pointee(CatalogSnapshot::empty()),
                generation: AtomicU64::new(0),
                next_ticket: AtomicU64::new(0),
                controls: Mutex::new(HashMap::new()),
                pad: Mutex::new(PadState::default()),
            }),
        }
    }

    pub fn logger(&self) -> &Arc<dyn CoreLog> {
        &self.inner.logger
    }

    /// Latest catalog snapshot.
    pub fn catalog(&self) -> Arc<CatalogSnapshot> {
        self.inner.catalog.load_full()
    }

    pub fn phase(&self, control_id: &str) -> ControlPhase {
        self.inner
            .controls
            .lock()
            .get(control_id)
            .map(|s| s.phase)
            .unwrap_or_default()
    }

    pub fn session(&self, control_id: &str) -> Option<SessionState> {
        self.inner
            .controls
            .lock()
            .get(control_id)
            .and_then(|s| s.session.clone())
    }

    pub fn pad(&self) -> PadState {
        self.inner.pad.lock().clone()
    }

    pub fn control_count(&self) -> usize {
        self.inner.controls.lock().len()
    }

    // ───────────────────────────── appear ─────────────────────────────

    /// Claim initialization for `control_id`.
    ///
    /// Returns `None` (and changes nothing) if the control is already initializing.
    pub fn begin_appear(&self, control_id: &str, kind: ControlKind) -> Option<InitTicket> {
        let mut controls = self.inner.controls.lock();
        let slot = controls
            .entry(control_id.to_string())
            .or_insert_with(|| ControlSlot::new(kind));

        if let Err(e) = slot.phase.transition(ControlPhase::Initializing) {
            self.inner
                .logger
                .warn(&format!("[appear] {control_id}: duplicate appearance dropped ({e})"));
            return None;
        }

        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        slot.kind = kind;
        slot.ticket = ticket;
        Some(InitTicket {
            control_id: control_id.to_string(),
            kind,
            ticket,
        })
    }

    /// Load settings, validate the install dir, (re)build the catalog if needed,
    /// create the control's view and render it.
    pub fn finish_appear(&self, ticket: InitTicket, host: &dyn ControlHost) {
        let id = ticket.control_id.as_str();
        let mut settings = host.load(id);

        if FilterSet::is_unset(&settings.filteroptions) {
            self.inner
                .logger
                .info(&format!("[appear] {id}: no filters set, defaulting to {DEFAULT_FILTERS:?}"));
            settings.filteroptions = DEFAULT_FILTERS.iter().map(|s| s.to_string()).collect();
            host.save(id, &settings);
        }

        self.initialize(ticket, settings, host);
    }

    /// [`Coordinator::begin_appear`] + [`Coordinator::finish_appear`] on the calling thread.
    /// Returns false if the appearance was dropped.
    pub fn control_appeared(
        &self,
        control_id: &str,
        kind: ControlKind,
        host: &dyn ControlHost,
    ) -> bool {
        match self.begin_appear(control_id, kind) {
            Some(t) => {
                self.finish_appear(t, host);
                true
            }
            None => false,
        }
    }

    fn initialize(&self, ticket: InitTicket, settings: ControlSettings, host: &dyn ControlHost) {
        let id = ticket.control_id.as_str();
        let dir = settings.install_dir();

        if !appinfo_path(&dir).is_file() {
            self.inner.logger.warn(&format!(
                "[initialize] {id}: no appinfo.vdf under {}",
                dir.display()
            ));
            let (failed, pending) = {
                let mut controls = self.inner.controls.lock();
                match controls.get_mut(id) {
                    Some(slot) if slot.ticket == ticket.ticket => {
                        slot.settings = settings;
                        slot.session = None;
                        let failed = slot.phase.transition(ControlPhase::Error).is_ok();
                        (failed, slot.pending.take())
                    }
                    _ => (false, None),
                }
            };
            if failed {
                host.render(id, ticket.kind, &Feedback::BadDirectory);
            }
            if let Some(next) = pending {
                self.settings_changed(id, next, host);
            }
            return;
        }

        self.ensure_catalog(&dir, false, host, Some(id));

        // re-read: another rebuild may have landed while we were scanning
        let snapshot = self.inner.catalog.load_full();
        let (renders, pending) = {
            let mut controls = self.inner.controls.lock();
            let Some(slot) = controls.get_mut(id) else {
                self.inner
                    .logger
                    .debug(&format!("[initialize] {id}: removed while initializing"));
                return;
            };
            if slot.ticket != ticket.ticket || slot.phase != ControlPhase::Initializing {
                self.inner
                    .logger
                    .debug(&format!("[initialize] {id}: superseded"));
                return;
            }

            let filters = FilterSet::from_options(&settings.filteroptions);
            let kind = slot.kind;
            match kind {
                ControlKind::Dial => {
                    let start = settings.last_scroll_index.unwrap_or(0) as usize;
                    let mut session = SessionState::new(id, filters, start);
                    session.project(&snapshot.entries);
                    slot.session = Some(session);
                }
                ControlKind::PadKey => {
                    slot.button_index = settings.button_index.unwrap_or(0) as usize;
                    let mut pad = self.inner.pad.lock();
                    if let Some(total) = settings.total_keys {
                        pad.set_total_keys(total as usize);
                    }
                    pad.set_filters(filters);
                    pad.project(&snapshot.entries);
                    if let Some(page) = settings.page_index {
                        pad.set_page_index(page as usize);
                    }
                }
            }
            slot.settings = settings;
            if let Err(e) = slot.phase.transition(ControlPhase::Ready) {
                self.inner.logger.error(&format!("[initialize] {id}: {e}"));
                return;
            }
            let pending = slot.pending.take();

            let renders = match kind {
                ControlKind::Dial => slot
                    .session
                    .as_ref()
                    .map(|s| vec![(id.to_string(), kind, s.feedback())])
                    .unwrap_or_default(),
                ControlKind::PadKey => {
                    let pad = self.inner.pad.lock();
                    pad_renders(&controls, &pad)
                }
            };
            (renders, pending)
        };

        self.inner.logger.debug(&format!(
            "[initialize] {id}: ready ({} catalog entries)",
            snapshot.entries.len()
        ));
        render_all(host, renders);

        if let Some(next) = pending {
            self.inner
                .logger
                .debug(&format!("[initialize] {id}: applying settings queued during init"));
            self.settings_changed(id, next, host);
        }
    }

    // ───────────────────────────── catalog ─────────────────────────────

    /// Rebuild when `dir` differs from the current snapshot (or `force`), then
    /// re-project every ready control except `skip`. Returns true if this call
    /// installed a new snapshot.
    fn ensure_catalog(
        &self,
        dir: &Path,
        force: bool,
        host: &dyn ControlHost,
        skip: Option<&str>,
    ) -> bool {
        if !force && self.inner.catalog.load().install_dir.as_deref() == Some(dir) {
            return false;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.logger.info(&format!(
            "[catalog] rebuilding #{generation} from {}",
            dir.display()
        ));

        let entries: Catalog = Arc::from(load_catalog(
            dir,
            self.inner.extractor.as_ref(),
            &self.inner.icons,
            &self.inner.logger,
        ));
        let fresh = Arc::new(CatalogSnapshot {
            install_dir: Some(dir.to_path_buf()),
            entries,
            generation,
        });

        let prev = self.inner.catalog.rcu(|cur| {
            if cur.generation > generation {
                Arc::clone(cur)
            } else {
                Arc::clone(&fresh)
            }
        });
        if prev.generation > generation {
            self.inner.logger.debug(&format!(
                "[catalog] rebuild #{generation} superseded by #{}",
                prev.generation
            ));
            return false;
        }

        self.reproject(host, skip);
        true
    }

    /// Re-run the scan for the current install dir and refresh every control.
    pub fn rescan(&self, host: &dyn ControlHost) {
        let Some(dir) = self.inner.catalog.load().install_dir.clone() else {
            self.inner.logger.debug("[rescan] no catalog yet");
            return;
        };
        if !appinfo_path(&dir).is_file() {
            self.inner
                .logger
                .warn(&format!("[rescan] {} is no longer a Steam dir", dir.display()));
            return;
        }
        self.ensure_catalog(&dir, true, host, None);
    }

    fn reproject(&self, host: &dyn ControlHost, skip: Option<&str>) {
        let snapshot = self.inner.catalog.load_full();
        let renders = {
            let mut controls = self.inner.controls.lock();
            let mut pad = self.inner.pad.lock();
            pad.project(&snapshot.entries);

            let mut out = Vec::new();
            for (id, slot) in controls.iter_mut() {
                if slot.phase != ControlPhase::Ready || skip == Some(id.as_str()) {
                    continue;
                }
                match slot.kind {
                    ControlKind::Dial => {
                        if let Some(s) = slot.session.as_mut() {
                            s.project(&snapshot.entries);
                            out.push((id.clone(), ControlKind::Dial, s.feedback()));
                        }
                    }
                    ControlKind::PadKey => out.push((
                        id.clone(),
                        ControlKind::PadKey,
                        Feedback::Key(pad.face(slot.button_index)),
                    )),
                }
            }
            out
        };
        render_all(host, renders);
    }

    // ───────────────────────────── settings ─────────────────────────────

    /// Apply settings pushed by the host for a known control.
    ///
    /// While the control is initializing the settings are queued (latest wins)
    /// and applied as soon as it settles.
    pub fn settings_changed(
        &self,
        control_id: &str,
        settings: ControlSettings,
        host: &dyn ControlHost,
    ) {
        let snapshot = self.inner.catalog.load_full();
        let new_dir = settings.install_dir();

        let mut controls = self.inner.controls.lock();
        let Some(slot) = controls.get_mut(control_id) else {
            self.inner
                .logger
                .debug(&format!("[settings] {control_id}: unknown control"));
            return;
        };
        match slot.phase {
            ControlPhase::Initializing => {
                self.inner
                    .logger
                    .debug(&format!("[settings] {control_id}: queued until initialized"));
                slot.pending = Some(settings);
                return;
            }
            ControlPhase::Uninitialized => {
                self.inner
                    .logger
                    .debug(&format!("[settings] {control_id}: ignored, not initialized"));
                return;
            }
            ControlPhase::Ready | ControlPhase::Error => {}
        }

        let needs_reload = slot.phase == ControlPhase::Error
            || slot.settings.install_dir() != new_dir
            || snapshot.install_dir.as_deref() != Some(new_dir.as_path());

        if needs_reload {
            if let Err(e) = slot.phase.transition(ControlPhase::Initializing) {
                self.inner.logger.error(&format!("[settings] {control_id}: {e}"));
                return;
            }
            let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
            slot.ticket = ticket;
            slot.settings = settings.clone();
            let kind = slot.kind;
            drop(controls);

            self.inner.logger.info(&format!(
                "[settings] {control_id}: install dir -> {}",
                new_dir.display()
            ));
            self.initialize(
                InitTicket {
                    control_id: control_id.to_string(),
                    kind,
                    ticket,
                },
                settings,
                host,
            );
            return;
        }

        let filters = FilterSet::from_options(&settings.filteroptions);
        let renders = match slot.kind {
            ControlKind::Dial => {
                let mut out = Vec::new();
                if let Some(session) = slot.session.as_mut() {
                    if session.set_filters(filters) {
                        session.project(&snapshot.entries);
                        session.set_scroll_index(settings.last_scroll_index.unwrap_or(0) as usize);
                    } else if let Some(i) = settings.last_scroll_index {
                        session.set_scroll_index(i as usize);
                    }
                    out.push((control_id.to_string(), ControlKind::Dial, session.feedback()));
                }
                slot.settings = settings;
                out
            }
            ControlKind::PadKey => {
                if let Some(b) = settings.button_index {
                    slot.button_index = b as usize;
                }
                let mut pad = self.inner.pad.lock();
                if let Some(total) = settings.total_keys {
                    pad.set_total_keys(total as usize);
                }
                if pad.set_filters(filters) {
                    pad.project(&snapshot.entries);
                }
                if let Some(page) = settings.page_index {
                    pad.set_page_index(page as usize);
                }
                slot.settings = settings;
                pad_renders(&controls, &pad)
            }
        };
        drop(controls);
        render_all(host, renders);
    }

    // ───────────────────────────── input ─────────────────────────────

    /// Scroll a dial. Positive ticks move to the previous entry.
    ///
    /// Only ready dials scroll; nothing is persisted while a reload is pending.
    pub fn rotate(&self, control_id: &str, ticks: i64, host: &dyn ControlHost) {
        let (settings, feedback) = {
            let mut controls = self.inner.controls.lock();
            let Some(slot) = controls.get_mut(control_id) else {
                return;
            };
            if slot.phase != ControlPhase::Ready {
                self.inner
                    .logger
                    .debug(&format!("[rotate] {control_id}: not ready ({:?})", slot.phase));
                return;
            }
            let Some(session) = slot.session.as_mut() else {
                self.inner
                    .logger
                    .debug(&format!("[rotate] {control_id}: no games to scroll through"));
                return;
            };
            let Some(index) = session.rotate(ticks) else {
                return;
            };
            let feedback = session.feedback();
            slot.settings.last_scroll_index = Some(index as u64);
            (slot.settings.clone(), feedback)
        };

        host.save(control_id, &settings);
        host.render(control_id, ControlKind::Dial, &feedback);
    }

    /// Dial press launches the current entry; pad keys page or launch.
    pub fn press(&self, control_id: &str, host: &dyn ControlHost) {
        let mut controls = self.inner.controls.lock();
        let Some(slot) = controls.get_mut(control_id) else {
            return;
        };
        if slot.phase != ControlPhase::Ready {
            self.inner
                .logger
                .debug(&format!("[press] {control_id}: not ready ({:?})", slot.phase));
            return;
        }

        match slot.kind {
            ControlKind::Dial => {
                let entry = slot
                    .session
                    .as_ref()
                    .and_then(|s| s.current())
                    .cloned();
                drop(controls);
                match entry {
                    Some(e) => self.launch(&e),
                    None => self
                        .inner
                        .logger
                        .info(&format!("[press] {control_id}: no games available to launch")),
                }
            }
            ControlKind::PadKey => {
                let button = slot.button_index;
                let mut pad = self.inner.pad.lock();
                match pad.role(button) {
                    role @ (KeyRole::Back | KeyRole::Next) => {
                        let moved = if role == KeyRole::Back {
                            pad.page_back()
                        } else {
                            pad.page_forward()
                        };
                        if !moved {
                            return;
                        }
                        slot.settings.page_index = Some(pad.page_index() as u64);
                        let settings = slot.settings.clone();
                        let renders = pad_renders(&controls, &pad);
                        drop(pad);
                        drop(controls);
                        host.save(control_id, &settings);
                        render_all(host, renders);
                    }
                    KeyRole::Game(_) => {
                        let entry = pad.game_for(button).cloned();
                        drop(pad);
                        drop(controls);
                        if let Some(e) = entry {
                            self.launch(&e);
                        }
                    }
                    KeyRole::Outside => {}
                }
            }
        }
    }

    fn launch(&self, entry: &CatalogEntry) {
        self.inner
            .logger
            .info(&format!("[launch] {} ({})", entry.name, entry.id));
        if let Err(e) = self.inner.launcher.launch(&entry.id) {
            self.inner
                .logger
                .error(&format!("[launch] failed to launch {}: {e}", entry.id));
        }
    }

    /// Forget a control. The catalog is left alone.
    pub fn control_removed(&self, control_id: &str) {
        if self.inner.controls.lock().remove(control_id).is_some() {
            self.inner
                .logger
                .debug(&format!("[remove] {control_id}: session dropped"));
        }
    }
}

fn pad_renders(controls: &HashMap<String, ControlSlot>, pad: &PadState) -> Vec<Render> {
    controls
        .iter()
        .filter(|(_, s)| s.kind == ControlKind::PadKey && s.phase == ControlPhase::Ready)
        .map(|(id, s)| {
            (
                id.clone(),
                ControlKind::PadKey,
                Feedback::Key(pad.face(s.button_index)),
            )
        })
        .collect()
}

fn render_all(host: &dyn ControlHost, renders: Vec<Render>) {
    for (id, kind, feedback) in renders {
        host.render(&id, kind, &feedback);
    }
}
