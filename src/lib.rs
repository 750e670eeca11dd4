// ConsoleLink - lib.rs
//
// Library entry point, exposing the console engine for hosts and integration
// tests. The `consolelink` binary in `main.rs` is one such host.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
