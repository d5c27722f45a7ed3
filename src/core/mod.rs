// SarifLens - core/mod.rs
//
// Core business logic layer: row model, store, filter, view settings,
// projection and export.
// Must NOT depend on: app, platform.

pub mod export;
pub mod filter;
pub mod model;
pub mod projection;
pub mod row;
pub mod store;
pub mod view;
