//! Deterministic, pure logic shared by the converter.
//!
//! Core modules must be free of I/O side effects. They operate on paths and
//! in-memory values and return deterministic outputs suitable for tests.

pub mod paths;
pub mod report;
pub mod types;
