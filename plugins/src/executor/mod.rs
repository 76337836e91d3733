pub mod renderers;

pub use renderers::{JsonlObserver, TextObserver};
