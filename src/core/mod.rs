// ConsoleLink - core/mod.rs
//
// Core business logic layer: entries, store, filter, Markdown rendering.
// Dependencies: standard library, chrono, serde (derives only).
// Must NOT depend on: app, platform, or perform any I/O.

pub mod filter;
pub mod markdown;
pub mod model;
pub mod store;
