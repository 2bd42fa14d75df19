use std::{
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CoreLog;

/// Category used when the extractor gives none, or no record matched.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Icon reference value meaning "this app has no icon".
pub const NO_ICON: &str = "NoIcon";

/// `<install dir>/appcache/appinfo.vdf`; also the install-dir validity check.
pub fn appinfo_path(install_dir: &Path) -> PathBuf {
    install_dir.join("appcache").join("appinfo.vdf")
}

/// Category + icon metadata for one app id, as reported by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadataRecord {
    pub id: String,
    pub category: String,
    pub icon_ref: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("failed to run appinfo extractor: {0}")]
    Invocation(String),
    #[error("failed to parse appinfo extractor output: {0}")]
    Parse(String),
}

/// Source of [`AppMetadataRecord`]s for a binary appinfo catalog.
pub trait MetadataExtractor: Send + Sync {
    fn fetch(
        &self,
        appinfo: &Path,
        logger: &Arc<dyn CoreLog>,
    ) -> Result<Vec<AppMetadataRecord>, ExtractorError>;
}

/// Parse extractor stdout: one `id,category[,iconRef]` record per line.
///
/// Blank lines are skipped. A missing or non-numeric id fails the whole parse.
pub fn parse_extractor_output(stdout: &str) -> Result<Vec<AppMetadataRecord>, ExtractorError> {
    let mut out = Vec::new();

    for (n, line) in stdout.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, ',').map(str::trim);
        let id = fields.next().unwrap_or_default();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ExtractorError::Parse(format!(
                "invalid app id on line {}: {line:?}",
                n + 1
            )));
        }

        let category = match fields.next() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => UNKNOWN_CATEGORY.to_string(),
        };

        let icon_ref = fields
            .next()
            .filter(|r| !r.is_empty() && *r != NO_ICON)
            .map(str::to_string);

        out.push(AppMetadataRecord {
            id: id.to_string(),
            category,
            icon_ref,
        });
    }

    Ok(out)
}

/// Runs the bundled `appinfoparser` helper with the catalog path as its only argument.
#[derive(Debug, Clone)]
pub struct ProcessExtractor {
    exe: PathBuf,
}

impl ProcessExtractor {
    pub fn new(exe: PathBuf) -> Self {
        Self { exe }
    }

    /// `<resource dir>/bin/appinfoparser[.exe]`
    pub fn bundled(resource_dir: &Path) -> Self {
        let name = if cfg!(windows) {
            "appinfoparser.exe"
        } else {
            "appinfoparser"
        };
        Self::new(resource_dir.join("bin").join(name))
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }
}

impl MetadataExtractor for ProcessExtractor {
    fn fetch(
        &self,
        appinfo: &Path,
        logger: &Arc<dyn CoreLog>,
    ) -> Result<Vec<AppMetadataRecord>, ExtractorError> {
        let output = Command::new(&self.exe)
            .arg(appinfo)
            .output()
            .map_err(|e| ExtractorError::Invocation(format!("{}: {e}", self.exe.display())))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            logger.warn(&format!("[appinfo] extractor stderr: {}", stderr.trim()));
        }

        if !output.status.success() {
            return Err(ExtractorError::Invocation(format!(
                "{} exited with {}",
                self.exe.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ExtractorError::Parse(format!("stdout is not UTF-8: {e}")))?;
        let records = parse_extractor_output(&stdout)?;
        logger.debug(&format!("[appinfo] {} metadata record(s)", records.len()));
        Ok(records)
    }
}
