//! I/O helpers for the conversion pass.

pub mod artifact;
pub mod config;
pub mod converter;
pub mod process;
pub mod scratch;
