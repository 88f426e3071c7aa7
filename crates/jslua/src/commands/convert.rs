//! Convert command - translates one JavaScript file to Lua

use anyhow::{anyhow, Context, Result};
use clap::Args;
use jslua_diagnostics::{
    DiagnosticEmitter, Diagnostics, JsonEmitter, SourceCache, TerminalEmitter,
};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::pipeline::convert_source;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input JavaScript file
    pub input: PathBuf,

    /// Output Lua file (default: input with a .lua extension, `-` for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the lowered and hoisted tree (for debugging)
    #[arg(long)]
    pub print_ast: bool,

    /// Wrap identifier reads in __RefCheck(...)
    #[arg(long)]
    pub ref_guard: bool,

    /// Path to a jslua.toml (default: next to the input)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn output_path(args: &ConvertArgs) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("lua"))
}

fn report(
    diagnostics: &Diagnostics,
    cache: &SourceCache,
    format: OutputFormat,
    use_color: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(std::io::stderr().lock(), use_color);
            emitter.emit_all(diagnostics, cache)?;
            if !diagnostics.is_empty() {
                emitter.emit_summary(diagnostics)?;
            }
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(std::io::stdout().lock());
            emitter.emit_all(diagnostics, cache)?;
        }
    }
    Ok(())
}

pub fn run(args: ConvertArgs, format: OutputFormat, use_color: bool, quiet: bool) -> Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("could not read {}", args.input.display()))?;

    let mut config = Config::locate(args.config.as_deref(), &args.input)?;
    if args.ref_guard {
        config.emit.ref_guard = true;
    }

    let filename = args.input.to_string_lossy().to_string();
    let mut cache = SourceCache::new();
    let mut diagnostics = Diagnostics::new();

    let conversion = match convert_source(
        &source,
        &filename,
        &mut cache,
        &config.emit,
        &mut diagnostics,
    ) {
        Ok(conversion) => conversion,
        Err(e) => {
            report(&diagnostics, &cache, format, use_color)?;
            return Err(e);
        }
    };

    if args.print_ast {
        eprintln!("{:#?}", conversion.program);
    }

    let output = output_path(&args);
    let to_stdout = output == Path::new("-");
    if to_stdout {
        print!("{}", conversion.lua);
    } else {
        fs::write(&output, &conversion.lua)
            .with_context(|| format!("could not write {}", output.display()))?;
    }

    report(&diagnostics, &cache, format, use_color)?;

    match format {
        OutputFormat::Text if !quiet && !to_stdout => {
            if use_color {
                println!(
                    "{} {} -> {}",
                    console::style("Converted").green().bold(),
                    args.input.display(),
                    output.display()
                );
            } else {
                println!("Converted {} -> {}", args.input.display(), output.display());
            }
        }
        OutputFormat::Json if !to_stdout => {
            let summary = serde_json::json!({
                "type": "summary",
                "success": !diagnostics.has_errors(),
                "input": args.input.to_string_lossy(),
                "output": output.to_string_lossy(),
                "errors": diagnostics.error_count(),
                "warnings": diagnostics.warning_count(),
                "hints": diagnostics.hint_count(),
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
        _ => {}
    }

    if diagnostics.has_errors() {
        Err(anyhow!("conversion of {} reported errors", args.input.display()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str, output: Option<&str>) -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
            print_ast: false,
            ref_guard: false,
            config: None,
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(output_path(&args("src/app.js", None)), PathBuf::from("src/app.lua"));
        assert_eq!(
            output_path(&args("src/app.js", Some("out/main.lua"))),
            PathBuf::from("out/main.lua")
        );
    }
}
