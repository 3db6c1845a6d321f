//! Rule compilation and match resolution.
//!
//! `compiler` turns a rule snapshot into combined matchers plus lookup tables;
//! `resolver` maps a matched span back to its replacement in constant time.

pub mod compiler;
pub mod resolver;

pub use compiler::{compile, literal_fragment, CompiledMatcherState};
