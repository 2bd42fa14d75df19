use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{CoreLog, steam::vdf};

/// App-state descriptor extension (`appmanifest_<id>.acf`).
pub const MANIFEST_EXT: &str = "acf";

/// One installed application as recorded by its app-state descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledGame {
    pub id: String,
    pub name: String,
}

/// Pull `appid` and `name` out of an app-state descriptor.
/// `None` when either is missing, the id isn't numeric, or the name is blank.
pub fn parse_manifest(text: &str) -> Option<InstalledGame> {
    let id = vdf::shallowest_value(text, "appid")?.trim().to_string();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let name = vdf::shallowest_value(text, "name")?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some(InstalledGame { id, name })
}

fn manifest_files(steamapps: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(steamapps)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(MANIFEST_EXT))
        })
        .collect();
    // read_dir order is platform dependent
    files.sort();
    Ok(files)
}

/// Scan `<root>/steamapps/*.acf` for every library root.
///
/// Roots without a `steamapps` folder and unreadable or incomplete descriptors
/// are skipped. Duplicates across libraries are kept; the catalog builder
/// collapses them by id.
pub fn scan_installed_games(roots: &[PathBuf], logger: &Arc<dyn CoreLog>) -> Vec<InstalledGame> {
    let mut games = Vec::new();

    for root in roots {
        let steamapps = root.join("steamapps");
        if !steamapps.is_dir() {
            logger.debug(&format!(
                "[scan_installed_games] skip {} (no steamapps)",
                root.display()
            ));
            continue;
        }

        let files = match manifest_files(&steamapps) {
            Ok(f) => f,
            Err(e) => {
                logger.warn(&format!(
                    "[scan_installed_games] list {}: {e}",
                    steamapps.display()
                ));
                continue;
            }
        };

        for file in files {
            let text = match fs::read_to_string(&file) {
                Ok(t) => t,
                Err(e) => {
                    logger.warn(&format!(
                        "[scan_installed_games] read {}: {e}",
                        file.display()
                    ));
                    continue;
                }
            };
            match parse_manifest(&text) {
                Some(game) => games.push(game),
                None => logger.debug(&format!(
                    "[scan_installed_games] {} has no appid/name",
                    file.display()
                )),
            }
        }
    }

    logger.info(&format!(
        "[scan_installed_games] {} installed app(s)",
        games.len()
    ));
    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_log::NoopLog;

    fn write_manifest(steamapps: &Path, id: &str, name: &str) {
        fs::write(
            steamapps.join(format!("appmanifest_{id}.acf")),
            format!("\"AppState\"\n{{\n\t\"appid\"\t\t\"{id}\"\n\t\"name\"\t\t\"{name}\"\n}}\n"),
        )
        .unwrap();
    }

    #[test]
    fn parse_requires_numeric_id_and_name() {
        assert_eq!(
            parse_manifest(r#""AppState" { "appid" "70" "name" "Half-Life" }"#),
            Some(InstalledGame {
                id: "70".into(),
                name: "Half-Life".into()
            })
        );
        assert_eq!(parse_manifest(r#""AppState" { "appid" "x70" "name" "A" }"#), None);
        assert_eq!(parse_manifest(r#""AppState" { "appid" "70" }"#), None);
        assert_eq!(parse_manifest(r#""AppState" { "name" "A" }"#), None);
    }

    #[test]
    fn scans_roots_and_skips_bad_entries() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let missing = a.path().join("nope");

        let apps_a = a.path().join("steamapps");
        fs::create_dir_all(&apps_a).unwrap();
        write_manifest(&apps_a, "10", "Counter-Strike");
        write_manifest(&apps_a, "20", "Team Fortress Classic");
        fs::write(apps_a.join("appmanifest_30.acf"), "\"AppState\" { \"appid\" \"30\" }").unwrap();
        fs::write(apps_a.join("libraryfolders.vdf"), "\"path\" \"ignored\"").unwrap();

        let apps_b = b.path().join("steamapps");
        fs::create_dir_all(&apps_b).unwrap();
        write_manifest(&apps_b, "10", "Counter-Strike");

        let logger: Arc<dyn CoreLog> = Arc::new(NoopLog);
        let games = scan_installed_games(
            &[a.path().to_path_buf(), missing, b.path().to_path_buf()],
            &logger,
        );

        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "20", "10"]);
    }
}
