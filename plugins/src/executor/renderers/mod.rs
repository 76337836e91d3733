pub mod jsonl;
pub mod text;

pub use jsonl::JsonlObserver;
pub use text::TextObserver;
