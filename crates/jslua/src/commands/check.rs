//! Check command - converts JavaScript files without writing output

use anyhow::{anyhow, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use jslua_diagnostics::{
    DiagnosticEmitter, Diagnostics, JsonEmitter, SourceCache, TerminalEmitter,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::pipeline::convert_source;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input JavaScript file or directory
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Show hints as well as warnings and errors
    #[arg(long)]
    pub all: bool,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Path to a jslua.toml (default: in the checked directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn is_js(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "js")
}

/// Collect all JavaScript files under a path
fn collect_js_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return if is_js(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.components().any(|c| c.as_os_str() == "node_modules") {
            continue;
        }

        if path.is_file() && is_js(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

pub fn run(args: CheckArgs, format: OutputFormat, use_color: bool, verbose: u8) -> Result<()> {
    let config = Config::locate(args.config.as_deref(), &args.input)?;
    let files = collect_js_files(&args.input);

    if files.is_empty() {
        match format {
            OutputFormat::Text => println!("No JavaScript files found."),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "files": 0,
                        "errors": 0,
                        "warnings": 0,
                    })
                );
            }
        }
        return Ok(());
    }

    if matches!(format, OutputFormat::Text) {
        println!("Checking {} file(s)...", files.len());
    }

    let mut source_cache = SourceCache::new();
    let mut all_diagnostics = Diagnostics::new();
    let mut checked_files = 0;
    let mut failed_files = 0;
    let mut visited = HashSet::new();

    let bar = progress_bar(files.len(), use_color && matches!(format, OutputFormat::Text));

    for file in &files {
        bar.inc(1);
        let canonical = match file.canonicalize() {
            Ok(p) => p,
            Err(_) => continue,
        };
        if !visited.insert(canonical.clone()) {
            continue;
        }
        bar.set_message(file.display().to_string());

        let source = match fs::read_to_string(&canonical) {
            Ok(s) => s,
            Err(e) => {
                if verbose > 0 {
                    bar.suspend(|| eprintln!("Warning: Could not read {}: {}", file.display(), e));
                }
                continue;
            }
        };

        let filename = file.to_string_lossy().to_string();
        match convert_source(
            &source,
            &filename,
            &mut source_cache,
            &config.emit,
            &mut all_diagnostics,
        ) {
            Ok(conversion) => {
                log::info!("{}: {} bytes of Lua", filename, conversion.lua.len());
            }
            Err(e) => {
                failed_files += 1;
                log::info!("{}", e);
            }
        }
        checked_files += 1;
    }
    bar.finish_and_clear();

    let shown = if args.all {
        all_diagnostics.clone()
    } else {
        let mut shown = Diagnostics::new();
        shown.extend(all_diagnostics.iter().filter(|d| !d.is_hint()).cloned());
        shown
    };

    let errors = all_diagnostics.error_count();
    let warnings = all_diagnostics.warning_count();

    match format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(std::io::stderr().lock(), use_color);
            emitter.emit_all(&shown, &source_cache)?;

            println!();
            if errors > 0 {
                if use_color {
                    println!(
                        "{}: {} error(s), {} warning(s)",
                        console::style("Check failed").red().bold(),
                        errors,
                        warnings
                    );
                } else {
                    println!("Check failed: {} error(s), {} warning(s)", errors, warnings);
                }
            } else if warnings > 0 && args.strict {
                if use_color {
                    println!(
                        "{}: {} warning(s) (strict mode)",
                        console::style("Check failed").yellow().bold(),
                        warnings
                    );
                } else {
                    println!("Check failed: {} warning(s) (strict mode)", warnings);
                }
            } else if warnings > 0 {
                if use_color {
                    println!(
                        "{}: {} warning(s)",
                        console::style("Check passed").yellow(),
                        warnings
                    );
                } else {
                    println!("Check passed: {} warning(s)", warnings);
                }
            } else if use_color {
                println!(
                    "{} - {} file(s) checked",
                    console::style("All checks passed!").green().bold(),
                    checked_files
                );
            } else {
                println!("All checks passed! - {} file(s) checked", checked_files);
            }
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(std::io::stdout().lock());
            emitter.emit_all(&shown, &source_cache)?;

            let summary = serde_json::json!({
                "type": "summary",
                "success": errors == 0 && (!args.strict || warnings == 0),
                "files_checked": checked_files,
                "files_failed": failed_files,
                "errors": errors,
                "warnings": warnings,
                "hints": all_diagnostics.hint_count(),
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    let has_blocking_issues = errors > 0 || (args.strict && warnings > 0);
    if has_blocking_issues {
        Err(anyhow!("Check failed with errors"))
    } else {
        Ok(())
    }
}
