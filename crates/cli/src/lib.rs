use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use command::RunSummary;
use config::BatchConfig;
use std::io;
use std::path::PathBuf;

mod command;
mod config;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "los-codes")]
#[command(about = "Build linked code lists and data cubes from statistical reference tables", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Batch configuration file
    #[arg(short, long, global = true, default_value = "los-codes.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Print the run summary as JSON on stdout (implies --quiet)
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Build every configured code list into cl-{tag}.ttl
    Codelists,

    /// Build structure definitions into dsd-{id}.ttl and dsd-{id}.json
    Dsd,

    /// Assemble observations per (dataset, measure) into ds-{id}.ttl
    Cube,

    /// Zip the documents of each (dataset type, measure) pair
    Package,

    /// Run codelists, dsd, cube and package in order
    All,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = BatchConfig::load(&cli.config)?;
    let summary = run(cli.command, &config)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        print_stdout(&json)?;
    } else {
        print_stdout(summary.render_text().trim_end())?;
    }

    if summary.skipped_records() > 0 {
        log::warn!("{} records were skipped", summary.skipped_records());
    }

    Ok(())
}

fn run(command: Commands, config: &BatchConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    match command {
        Commands::Codelists => command::codelists::run(config, &mut summary)?,
        Commands::Dsd => command::dsd::run(config, &mut summary)?,
        Commands::Cube => command::cube::run(config, &mut summary)?,
        Commands::Package => command::package::run(config, &mut summary)?,
        Commands::All => {
            command::codelists::run(config, &mut summary)?;
            command::dsd::run(config, &mut summary)?;
            command::cube::run(config, &mut summary)?;
            command::package::run(config, &mut summary)?;
        }
    }
    Ok(summary)
}
