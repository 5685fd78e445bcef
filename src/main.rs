use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use variability::manager::Manager;
use variability::series::AnalysisMode;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    data_dir: PathBuf,

    /// Override the analysis mode of the config (percentages or absolute).
    #[arg(long)]
    mode: Option<AnalysisMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Show {
        #[arg(long)]
        company_id: Option<u64>,
    },

    Export,

    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.data_dir, args.mode).context("failed to construct mgr")?;

    match args.command {
        Command::Show { company_id } => mgr.show_table(company_id)?,
        Command::Export => mgr.export_tables()?,
        Command::Clean => mgr.clean_exports()?,
    }

    Ok(())
}
