use std::env;
use std::path::PathBuf;

/// Directory holding the plugin binary, `imgs/` and `bin/appinfoparser`.
pub(crate) fn get_resource_dir() -> Result<PathBuf, String> {
    let exe = env::current_exe().map_err(|e| format!("Failed to get current executable path: {e}"))?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "Failed to get parent directory of current executable".to_string())
}
