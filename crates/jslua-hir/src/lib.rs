//! Translator tree for jslua
//!
//! The tree is a closed, ES5-shaped subset of JavaScript. [`lower`] builds it
//! from an swc script and [`declarations`] answers which names a body binds.

pub mod declarations;
pub mod ir;
pub mod lower;

pub use declarations::{analyze, function_references, DeclarationInfo};
pub use ir::*;
pub use lower::lower_script;
