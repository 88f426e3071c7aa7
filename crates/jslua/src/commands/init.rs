//! Init command - write a default jslua.toml

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::config::CONFIG_FILE;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

const DEFAULT_CONFIG: &str = r#"# jslua configuration

[emit]
# Wrap identifier reads in __RefCheck(...) to trap reads of unassigned names
ref_guard = false
# Line terminator of the generated Lua: "lf" or "crlf"
newline = "crlf"
# Emit -- BEGIN / -- END and try/with phase comments
markers = true
"#;

pub fn run(args: InitArgs, format: OutputFormat, _use_color: bool) -> Result<()> {
    fs::create_dir_all(&args.path)?;
    let project_path = args.path.canonicalize().unwrap_or(args.path.clone());

    let config_path = project_path.join(CONFIG_FILE);
    let created = if config_path.exists() {
        false
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        true
    };

    match format {
        OutputFormat::Text => {
            if created {
                println!("  Created {}", config_path.display());
            } else {
                println!("  Skipped {} (already exists)", config_path.display());
            }
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "created": created,
                "path": config_path.to_string_lossy(),
            });
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    Ok(())
}
