#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! mavtest-gen builds end-to-end test fixtures for the javascript message
//! bindings.
//!
//! It runs the C reference binaries (`testmav<version>_<set>`), reads the hex
//! dumps and decodes they print, and emits mocha test cases that pack the same
//! messages in javascript and compare the result byte for byte.

// Shared types (protocol versions, flag bits).
pub mod types;

// Parsed records: hex dumps, field values, test records.
pub mod primitives;

pub use primitives::*;

// Line-oriented parsing of reference output.
pub mod parser;

// Wide-integer / typed-array wrapping learned from helper files.
pub mod lookup;

// Output text.
pub mod template;

pub mod generator;

pub mod config;

pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::GeneratorConfig;
pub use error::GenError;
pub use generator::{GeneratedOutput, Generator, ProcessSource, ReferenceSource};
