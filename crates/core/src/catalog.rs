//! Joins installed apps with their appinfo metadata into the display catalog.

use std::{collections::HashMap, path::Path, sync::Arc};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    CoreLog,
    steam::{
        appinfo::{AppMetadataRecord, ExtractorError, MetadataExtractor, UNKNOWN_CATEGORY, appinfo_path},
        icon::IconResolver,
        library::library_paths,
        manifest::{InstalledGame, scan_installed_games},
    },
};

/// Display-ready catalog row. `icon_path` is always usable (real file or placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub icon_path: String,
}

/// Immutable catalog snapshot. Replaced wholesale on reload, never edited.
pub type Catalog = Arc<[CatalogEntry]>;

/// Left-join `games` with `metadata` on app id.
///
/// One entry per distinct game id, in first-seen scan order. When the
/// extractor failed, every entry gets [`UNKNOWN_CATEGORY`] and the placeholder.
pub fn build_catalog(
    games: Vec<InstalledGame>,
    metadata: Result<Vec<AppMetadataRecord>, ExtractorError>,
    icon_root: &Path,
    icons: &IconResolver,
    logger: &Arc<dyn CoreLog>,
) -> Vec<CatalogEntry> {
    let by_id: HashMap<String, AppMetadataRecord> = match metadata {
        // later duplicates overwrite earlier ones
        Ok(records) => records.into_iter().map(|r| (r.id.clone(), r)).collect(),
        Err(e) => {
            logger.warn(&format!("[build_catalog] metadata unavailable: {e}"));
            HashMap::new()
        }
    };

    let mut unique: IndexMap<String, InstalledGame> = IndexMap::with_capacity(games.len());
    for g in games {
        unique.entry(g.id.clone()).or_insert(g);
    }

    let mut unmatched = 0usize;
    let entries: Vec<CatalogEntry> = unique
        .into_values()
        .map(|g| match by_id.get(&g.id) {
            Some(meta) => CatalogEntry {
                icon_path: icons.resolve(icon_root, &g.id, meta.icon_ref.as_deref()),
                category: meta.category.clone(),
                id: g.id,
                name: g.name,
            },
            None => {
                unmatched += 1;
                CatalogEntry {
                    icon_path: icons.placeholder_string(),
                    category: UNKNOWN_CATEGORY.to_string(),
                    id: g.id,
                    name: g.name,
                }
            }
        })
        .collect();

    logger.info(&format!(
        "[build_catalog] {} entries, {} without metadata",
        entries.len(),
        unmatched
    ));
    entries
}

/// Full pipeline for one install dir: libraries, manifests, appinfo, join.
pub fn load_catalog(
    install_dir: &Path,
    extractor: &dyn MetadataExtractor,
    icons: &IconResolver,
    logger: &Arc<dyn CoreLog>,
) -> Vec<CatalogEntry> {
    let roots = library_paths(install_dir, logger);
    let games = scan_installed_games(&roots, logger);
    let metadata = extractor.fetch(&appinfo_path(install_dir), logger);
    build_catalog(games, metadata, install_dir, icons, logger)
}
