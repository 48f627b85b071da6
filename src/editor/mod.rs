// src/editor/mod.rs

pub mod args;
pub mod license;
