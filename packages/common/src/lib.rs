//! Utilities shared across Weave crates: tree visitors and a filesystem
//! abstraction.

pub mod filesystem;
pub mod visitor;

pub use filesystem::*;
pub use visitor::*;
