//! Parse, lower, hoist and emit one source file.

use anyhow::Result;
use jslua_codegen::EmitOptions;
use jslua_diagnostics::{Diagnostics, SourceCache};
use jslua_hir::Program;

/// Output of converting one file.
#[derive(Debug)]
pub struct Conversion {
    /// The hoisted program that was emitted
    pub program: Program,
    pub lua: String,
}

/// Convert `source` to Lua. Diagnostics from every pass are appended to
/// `diagnostics`; a fatal parse error is returned as `Err` after being
/// recorded there.
pub fn convert_source(
    source: &str,
    filename: &str,
    cache: &mut SourceCache,
    options: &EmitOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Conversion> {
    let parsed = jslua_parser::parse_script_with_cache(source, filename, cache, diagnostics)?;
    diagnostics.extend(parsed.diagnostics);

    let program = jslua_hir::lower_script(&parsed.script, parsed.spans, diagnostics);
    log::debug!("{}: lowered {} statements", filename, program.body.len());

    let program = jslua_transform::hoist_program(program);
    let translation = jslua_codegen::emit_program(&program, options);
    diagnostics.extend(translation.diagnostics);

    Ok(Conversion {
        program,
        lua: translation.lua,
    })
}
