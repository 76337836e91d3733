//! Task templates, concrete instances and the registries that hold them.
//!
//! A [`TaskTemplate`] is a task kind: it generates parameters, checks
//! success against the environment and sets up / tears down device state.
//! A [`TaskInstance`] binds a template to one parameter set and is immutable
//! once built.

pub mod registry;
pub mod traits;
pub mod types;

pub use registry::{FamilyCatalog, TaskRegistry};
pub use traits::{TaskTemplate, TerminationFn};
pub use types::{InstanceIdentity, Params, TaskInstance, INSTANCE_SEPARATOR, SEED_PARAM};
