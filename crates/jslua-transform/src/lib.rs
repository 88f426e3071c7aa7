//! Tree transformations for jslua
//!
//! Passes that run on the translator tree between lowering and emission:
//! - Declaration hoisting

pub mod hoist;

pub use hoist::{hoist_function, hoist_program};
