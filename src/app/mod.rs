// SarifLens - app/mod.rs
//
// Application layer: the update coordinator, UI intents and the settings
// source seam.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod action;
pub mod engine;
pub mod settings;
