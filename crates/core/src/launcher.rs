/// Starts an installed game. Fire-and-forget: the caller only logs errors.
pub trait GameLauncher: Send + Sync {
    fn launch(&self, app_id: &str) -> Result<(), String>;
}

pub fn steam_run_uri(app_id: &str) -> String {
    format!("steam://rungameid/{app_id}")
}

/// Hands `steam://rungameid/<id>` to the OS URL handler.
pub struct SteamUriLauncher;

impl GameLauncher for SteamUriLauncher {
    fn launch(&self, app_id: &str) -> Result<(), String> {
        if app_id.is_empty() || !app_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("refusing to launch non-numeric app id {app_id:?}"));
        }
        open::that_detached(steam_run_uri(app_id)).map_err(|e| e.to_string())
    }
}
