// ConsoleLink - platform/mod.rs
//
// Platform abstraction layer: config/data directories, file replacement,
// system clipboard.
// Dependencies: util, directories, arboard.
// Must NOT depend on: core, app.

pub mod clipboard;
pub mod config;
pub mod fs;
