mod artifacts_cmd;
mod config;
mod generate_cmd;
mod plan_cmds;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::{CareplanConfig, CliOverrides};

#[derive(Parser)]
#[command(
    name = "careplan",
    about = "Generate 7-day care plans and walk through them one day at a time"
)]
struct Cli {
    /// Chat-completions endpoint URL (overrides CAREPLAN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Model name (overrides CAREPLAN_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// API key (overrides CAREPLAN_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a careplan config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a care plan from a patient report and print the cleaned text
    Generate {
        /// Path to the patient report
        #[arg(long)]
        report: PathBuf,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Walk through a previously generated plan day by day
    Present {
        /// Path to the raw plan text
        file: PathBuf,
        /// Write the session outcome as JSON to this file
        #[arg(long)]
        save_report: Option<PathBuf>,
    },
    /// Generate a plan and walk through it immediately
    Run {
        /// Path to the patient report
        #[arg(long)]
        report: PathBuf,
        /// Write the session outcome as JSON to this file
        #[arg(long)]
        save_report: Option<PathBuf>,
    },
    /// Validate a raw plan and summarize the sections each day carries
    Check {
        /// Path to the raw plan text, or `-` for stdin
        file: String,
    },
    /// Load-check the model artifacts listed in a manifest
    Artifacts {
        /// Path to the artifact manifest (TOML)
        #[arg(long)]
        manifest: PathBuf,
        /// Directory artifact paths are relative to (defaults to the manifest's directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Fail if any artifact cannot be loaded
        #[arg(long)]
        require_all: bool,
    },
}

/// Execute the `careplan init` command: write config file.
fn cmd_init(api_key: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        auth: config::AuthSection {
            api_key: api_key.map(str::to_string),
        },
        ..config::ConfigFile::default()
    };

    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  generator.base_url = {}", cfg.generator.base_url);
    println!("  generator.model = {}", cfg.generator.model);
    match api_key {
        Some(key) => match (key.get(..4), key.get(key.len().saturating_sub(4)..)) {
            (Some(head), Some(tail)) if key.len() > 8 => {
                println!("  auth.api_key = {head}...{tail}");
            }
            _ => println!("  auth.api_key = (set)"),
        },
        None => {
            println!("  auth.api_key = (unset)");
            println!();
            println!("Set CAREPLAN_API_KEY or rerun with --api-key before generating plans.");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = CliOverrides {
        api_url: cli.api_url,
        model: cli.model,
        api_key: cli.api_key,
    };

    match cli.command {
        Commands::Init { force } => {
            cmd_init(overrides.api_key.as_deref(), force)?;
        }
        Commands::Generate { report, output } => {
            let resolved = CareplanConfig::resolve(&overrides);
            generate_cmd::run_generate(&resolved, &report, output.as_deref()).await?;
        }
        Commands::Present { file, save_report } => {
            let plan = plan_cmds::load_plan(&file)?;
            plan_cmds::present_on_console(&plan, save_report.as_deref())?;
        }
        Commands::Run {
            report,
            save_report,
        } => {
            let resolved = CareplanConfig::resolve(&overrides);
            generate_cmd::run_interactive(&resolved, &report, save_report.as_deref()).await?;
        }
        Commands::Check { file } => {
            let raw = plan_cmds::read_plan_source(&file)?;
            plan_cmds::run_check(raw, &mut std::io::stdout().lock())?;
        }
        Commands::Artifacts {
            manifest,
            base_dir,
            require_all,
        } => {
            artifacts_cmd::run_artifacts(
                &manifest,
                base_dir.as_deref(),
                require_all,
                &mut std::io::stdout().lock(),
            )?;
        }
    }

    Ok(())
}
