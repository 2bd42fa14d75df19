pub mod core_log;
pub mod resource_dir;
pub mod sd_host;
