use std::sync::Arc;
use steamscroll_core::prelude::{CoreLog, LogLevel};
use streamdeck_lib::prelude::*;

/// Routes core diagnostics into the plugin's file log.
pub struct PluginCoreLog(pub Arc<dyn ActionLog>);

impl CoreLog for PluginCoreLog {
    fn log(&self, level: LogLevel, msg: &str) {
        let level = match level {
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        };
        self.0.log_level(level, msg);
    }
}
