//! jslua - JavaScript to Lua 5.2 translator
//!
//! CLI driver for converting JavaScript files into Lua source.

mod commands;
mod config;
mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// JavaScript to Lua translator
#[derive(Parser, Debug)]
#[command(name = "jslua")]
#[command(author, version, about = "Translate JavaScript to Lua 5.2")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a JavaScript file to Lua
    Convert(commands::convert::ConvertArgs),

    /// Convert every JavaScript file under a path and report diagnostics
    Check(commands::check::CheckArgs),

    /// Write a default jslua.toml
    Init(commands::init::InitArgs),

    /// Explain a diagnostic code
    Explain(commands::explain::ExplainArgs),
}

/// Check if the first non-flag argument looks like a JavaScript file
fn is_legacy_invocation(args: &[String]) -> bool {
    for arg in args.iter().skip(1) {
        if arg.starts_with('-') {
            continue;
        }
        if arg.ends_with(".js") {
            return true;
        }
        if matches!(
            arg.as_str(),
            "convert" | "check" | "init" | "explain" | "help"
        ) {
            return false;
        }
        break;
    }
    false
}

/// Transform legacy args (jslua file.js -o out.lua) to subcommand form
fn transform_legacy_args(args: Vec<String>) -> Vec<String> {
    let mut new_args = vec![args[0].clone(), "convert".to_string()];
    new_args.extend(args.into_iter().skip(1));
    new_args
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    // Handle legacy invocation (jslua file.js -o out.lua)
    let args: Vec<String> = std::env::args().collect();
    let effective_args = if is_legacy_invocation(&args) {
        transform_legacy_args(args)
    } else {
        args
    };

    let cli = Cli::parse_from(effective_args);
    init_logging(cli.verbose);

    let use_color = !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stdout);

    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Convert(args) => {
            commands::convert::run(args, cli.format, use_color, cli.quiet)
        }
        Commands::Check(args) => {
            commands::check::run(args, cli.format, use_color, cli.verbose)
        }
        Commands::Init(args) => commands::init::run(args, cli.format, use_color),
        Commands::Explain(args) => commands::explain::run(args, cli.format, use_color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_legacy_invocation() {
        assert!(is_legacy_invocation(&args(&["jslua", "app.js"])));
        assert!(is_legacy_invocation(&args(&["jslua", "-v", "app.js", "-o", "app.lua"])));
        assert!(!is_legacy_invocation(&args(&["jslua", "convert", "app.js"])));
        assert!(!is_legacy_invocation(&args(&["jslua", "explain", "U001"])));
        assert!(!is_legacy_invocation(&args(&["jslua"])));
    }

    #[test]
    fn test_legacy_args_rewritten() {
        let rewritten = transform_legacy_args(args(&["jslua", "app.js", "-o", "out.lua"]));
        assert_eq!(rewritten, args(&["jslua", "convert", "app.js", "-o", "out.lua"]));
        let cli = Cli::try_parse_from(rewritten).unwrap();
        assert!(matches!(cli.command, Some(Commands::Convert(_))));
    }
}
