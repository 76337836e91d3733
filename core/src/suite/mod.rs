//! Suite construction: seeded instantiation of every registered template and
//! validation of the requested task subset.

pub mod builder;
pub mod filter;
pub mod types;

pub use builder::{build_suite, instantiate, SuiteOptions};
pub use filter::{fuzzy_score, suggest_keyword, validate_filter, SUGGESTION_THRESHOLD};
pub use types::Suite;
