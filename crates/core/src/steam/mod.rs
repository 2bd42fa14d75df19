//! Readers for the Steam install: library roots, app manifests, appinfo
//! metadata and the icon cache.
pub mod appinfo;
pub mod icon;
pub mod library;
pub mod manifest;
pub mod vdf;
