//! CLI command implementations

pub mod batch;
pub mod calc;
pub mod completions;
pub mod config;
pub mod styles;
