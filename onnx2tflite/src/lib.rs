//! ONNX to TFLite conversion by way of an external converter.
//!
//! The crate wraps a third-party converter (`onnx2tf` by default) that does
//! all of the actual format translation. What remains here is plumbing:
//!
//! - **[`core`]**: Pure logic (output naming, outcome types, console report).
//!   No I/O.
//! - **[`io`]**: Side effects (config file, child process, work directory,
//!   artifact move). The [`io::converter::Converter`] seam lets tests swap the
//!   external tool for a scripted fake.
//!
//! [`convert`] ties them into a single conversion pass.

pub mod convert;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
