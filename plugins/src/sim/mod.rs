//! In-process simulated device and a small family of tasks against it.
//!
//! Enough of a world to drive the engine end to end without a real device:
//! toggles, a brightness slider, a clipboard, a timer and an app launcher.

pub mod device;
pub mod oracle;
pub mod tasks;

pub use device::{SimAction, SimDevice, MAX_BRIGHTNESS};
pub use oracle::{solve, OracleAgent};
pub use tasks::{apps_registry, system_registry};
