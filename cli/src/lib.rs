//! suitekit-cli library: command definitions and handlers, exposed for tests.

pub mod app;
pub mod commands;
