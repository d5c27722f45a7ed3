// SarifLens - platform/mod.rs
//
// Platform layer: config directory resolution, config.toml loading, the
// file-backed view settings store, and export to disk.

pub mod config;
pub mod export;
pub mod settings_store;
