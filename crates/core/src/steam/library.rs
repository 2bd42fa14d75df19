use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{CoreLog, steam::vdf};

/// `<install dir>/steamapps/libraryfolders.vdf`
pub fn library_folders_path(install_dir: &Path) -> PathBuf {
    install_dir.join("steamapps").join("libraryfolders.vdf")
}

/// Every `"path"` value of a library-folders descriptor, in document order.
pub fn parse_library_paths(vdf_text: &str) -> Vec<PathBuf> {
    vdf::values_of(vdf_text, "path")
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Read the install's library descriptor and return its library roots.
/// A missing or unreadable descriptor means "no libraries", never an error.
pub fn library_paths(install_dir: &Path, logger: &Arc<dyn CoreLog>) -> Vec<PathBuf> {
    let file = library_folders_path(install_dir);
    let text = match fs::read_to_string(&file) {
        Ok(t) => t,
        Err(e) => {
            logger.warn(&format!(
                "[library_paths] cannot read {}: {e}",
                file.display()
            ));
            return Vec::new();
        }
    };

    let roots = parse_library_paths(&text);
    logger.info(&format!(
        "[library_paths] {} library root(s) in {}",
        roots.len(),
        file.display()
    ));
    roots
}
