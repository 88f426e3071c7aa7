//! Lua 5.2 code generation for jslua
//!
//! Turns a hoisted [`jslua_hir::Program`] into Lua source that relies on the
//! jslua runtime library for JavaScript semantics.

pub mod alloc;
pub mod emit;
pub mod names;
pub mod options;
pub mod runtime;
pub mod scope;

pub use emit::Emitter;
pub use options::{EmitOptions, Newline};

use jslua_diagnostics::Diagnostics;
use jslua_hir::Program;

/// Result of emitting one program.
#[derive(Debug)]
pub struct Translation {
    pub lua: String,
    /// Unsupported constructs and partial emulations met while emitting
    pub diagnostics: Diagnostics,
}

/// Emit Lua for a program whose declarations have already been hoisted.
pub fn emit_program(program: &Program, options: &EmitOptions) -> Translation {
    Emitter::new(options).emit_program(program)
}
