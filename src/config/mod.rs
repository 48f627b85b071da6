// src/config/mod.rs

pub mod loader;
pub mod model;

pub use loader::resolve;
pub use model::{ConfigFile, Credentials, RunConfig, Timeouts};
