// ConsoleLink - app/mod.rs
//
// Application layer: console session, export sink, preference persistence,
// host event feed.
// Dependencies: core, platform, util.

pub mod console;
pub mod export;
pub mod feed;
pub mod prefs;
