use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bos_core::{PipelineConfig, Workspace};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "BOS sensor export cleaning", long_about = None)]
struct Cli {
    /// Pipeline configuration file (defaults to $BOS_CONFIG, then ./bos.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List raw files waiting in staging
    Staged,
    /// Copy raw sensor exports into staging
    Stage(StageArgs),
    /// Remove a file from staging
    DeleteStaged(NameArg),
    /// List published clean files
    Cleaned,
    /// Remove a published clean file
    DeleteClean(NameArg),
    /// Classify and clean every staged file
    Clean(CleanArgs),
    /// Show the most recent actions
    Log,
}

#[derive(Args, Debug)]
struct StageArgs {
    /// Files to copy into staging
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct NameArg {
    /// Bare file name inside the directory
    name: String,
}

#[derive(Args, Debug, Default)]
struct CleanArgs {
    /// Replace clean files that already exist
    #[arg(long)]
    overwrite: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())
        .context("failed to load pipeline configuration")?;
    let workspace = Workspace::from_config(config);

    match cli.command {
        Command::Staged => print_names(workspace.list_staged()?),
        Command::Stage(args) => handle_stage(&workspace, args),
        Command::DeleteStaged(arg) => {
            if !workspace.delete_staged(&arg.name)? {
                bail!("no staged file named '{}'", arg.name);
            }
            Ok(())
        }
        Command::Cleaned => print_names(workspace.list_clean()?),
        Command::DeleteClean(arg) => {
            if !workspace.delete_clean(&arg.name)? {
                bail!("no clean file named '{}'", arg.name);
            }
            Ok(())
        }
        Command::Clean(args) => {
            let outcome = workspace.run_clean(args.overwrite);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Log => print_names(workspace.action_log()),
    }
}

fn handle_stage(workspace: &Workspace, args: StageArgs) -> Result<()> {
    for path in &args.files {
        let name = workspace
            .stage_file(path)
            .with_context(|| format!("failed to stage '{}'", path.display()))?;
        info!(name = %name, "staged");
    }
    Ok(())
}

fn print_names(names: Vec<String>) -> Result<()> {
    for name in names {
        println!("{name}");
    }
    Ok(())
}
