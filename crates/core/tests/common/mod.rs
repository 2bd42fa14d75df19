#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use steamscroll_core::{core_log::MemoryLog, prelude::*};
use tempfile::TempDir;

/// Throwaway Steam install: `steamapps/`, `appcache/appinfo.vdf`, icon cache.
pub struct SteamFixture {
    pub dir: TempDir,
}

impl SteamFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("steamapps")).unwrap();
        fs::create_dir_all(root.join("appcache")).unwrap();
        fs::write(root.join("appcache").join("appinfo.vdf"), b"\x29\x44\x56\x07").unwrap();

        let escaped = root.to_string_lossy().replace('\\', "\\\\");
        fs::write(
            root.join("steamapps").join("libraryfolders.vdf"),
            format!("\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{escaped}\"\n\t}}\n}}\n"),
        )
        .unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn root_string(&self) -> String {
        self.root().to_string_lossy().into_owned()
    }

    pub fn add_game(&self, id: &str, name: &str) -> &Self {
        fs::write(
            self.root()
                .join("steamapps")
                .join(format!("appmanifest_{id}.acf")),
            format!("\"AppState\"\n{{\n\t\"appid\"\t\t\"{id}\"\n\t\"name\"\t\t\"{name}\"\n}}\n"),
        )
        .unwrap();
        self
    }

    pub fn add_icon(&self, id: &str, icon_ref: &str) -> PathBuf {
        let p = self
            .root()
            .join("appcache")
            .join("librarycache")
            .join(id)
            .join(format!("{icon_ref}.jpg"));
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, b"jpg").unwrap();
        p
    }
}

/// Extractor returning canned stdout (parsed with the real parser).
pub struct ScriptedExtractor {
    output: Mutex<Result<String, String>>,
    pub calls: AtomicUsize,
    /// (entered, release): signals entry, then blocks until released.
    gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl ScriptedExtractor {
    pub fn ok(stdout: &str) -> Self {
        Self {
            output: Mutex::new(Ok(stdout.to_string())),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            output: Mutex::new(Err(msg.to_string())),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub fn gated(stdout: &str, entered: Sender<()>, release: Receiver<()>) -> Self {
        let extractor = Self::ok(stdout);
        extractor.arm(entered, release);
        extractor
    }

    /// Block every following fetch on `release` (after signalling `entered`).
    pub fn arm(&self, entered: Sender<()>, release: Receiver<()>) {
        *self.gate.lock() = Some((entered, release));
    }

    pub fn set_output(&self, stdout: &str) {
        *self.output.lock() = Ok(stdout.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataExtractor for ScriptedExtractor {
    fn fetch(
        &self,
        _appinfo: &Path,
        _logger: &Arc<dyn CoreLog>,
    ) -> Result<Vec<AppMetadataRecord>, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().clone();
        if let Some((entered, release)) = gate {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }
        match &*self.output.lock() {
            Ok(stdout) => parse_extractor_output(stdout),
            Err(e) => Err(ExtractorError::Invocation(e.clone())),
        }
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<String>>,
    pub fail: bool,
}

impl GameLauncher for RecordingLauncher {
    fn launch(&self, app_id: &str) -> Result<(), String> {
        self.launched.lock().push(app_id.to_string());
        if self.fail {
            Err("no steam client".to_string())
        } else {
            Ok(())
        }
    }
}

/// Settings store + display surface that records everything.
#[derive(Default)]
pub struct MockHost {
    pub settings: Mutex<HashMap<String, ControlSettings>>,
    pub saves: Mutex<Vec<(String, ControlSettings)>>,
    pub renders: Mutex<Vec<(String, ControlKind, Feedback)>>,
}

impl MockHost {
    pub fn with_settings(self, control_id: &str, settings: ControlSettings) -> Self {
        self.settings.lock().insert(control_id.to_string(), settings);
        self
    }

    pub fn renders_for(&self, control_id: &str) -> Vec<Feedback> {
        self.renders
            .lock()
            .iter()
            .filter(|(id, _, _)| id == control_id)
            .map(|(_, _, f)| f.clone())
            .collect()
    }

    pub fn last_render(&self, control_id: &str) -> Option<Feedback> {
        self.renders_for(control_id).pop()
    }

    pub fn last_saved(&self, control_id: &str) -> Option<ControlSettings> {
        self.saves
            .lock()
            .iter()
            .rev()
            .find(|(id, _)| id == control_id)
            .map(|(_, s)| s.clone())
    }
}

impl SettingsStore for MockHost {
    fn load(&self, control_id: &str) -> ControlSettings {
        self.settings
            .lock()
            .get(control_id)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, control_id: &str, settings: &ControlSettings) {
        self.settings
            .lock()
            .insert(control_id.to_string(), settings.clone());
        self.saves
            .lock()
            .push((control_id.to_string(), settings.clone()));
    }
}

impl DisplaySurface for MockHost {
    fn render(&self, control_id: &str, kind: ControlKind, feedback: &Feedback) {
        self.renders
            .lock()
            .push((control_id.to_string(), kind, feedback.clone()));
    }
}

pub struct Harness {
    pub coordinator: Coordinator,
    pub extractor: Arc<ScriptedExtractor>,
    pub launcher: Arc<RecordingLauncher>,
    pub log: Arc<MemoryLog>,
}

pub fn harness(extractor: ScriptedExtractor) -> Harness {
    harness_with(extractor, RecordingLauncher::default())
}

pub fn harness_with(extractor: ScriptedExtractor, launcher: RecordingLauncher) -> Harness {
    let extractor = Arc::new(extractor);
    let launcher = Arc::new(launcher);
    let log = Arc::new(MemoryLog::default());
    let coordinator = Coordinator::new(
        extractor.clone(),
        launcher.clone(),
        IconResolver::new(PathBuf::from("imgs/placeholder.jpeg")),
        log.clone(),
    );
    Harness {
        coordinator,
        extractor,
        launcher,
        log,
    }
}

pub fn settings_for(dir: &str, filters: &[&str]) -> ControlSettings {
    ControlSettings {
        custom_steam_dir: Some(dir.to_string()),
        filteroptions: filters.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

pub fn current_title(feedback: &Feedback) -> Option<&str> {
    match feedback {
        Feedback::Wheel { current, .. } => Some(current.title.as_str()),
        _ => None,
    }
}
