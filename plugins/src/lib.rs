pub mod checkpoint;
pub mod executor;
pub mod factory;
pub mod sim;
