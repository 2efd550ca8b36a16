use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use tally_finance::analyze;
use tally_ingest::SourceFormat;

mod config;
mod entities;
mod logging;
mod report;
mod state;

use config::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("TALLY_GIT_DESCRIBE"),
        ", ",
        env!("TALLY_BUILD_TARGET"),
        ")"
    ),
    about = "Classify bank statement narrations and summarize payment rails"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a CSV, XLSX, PDF or DOCX statement
    Analyze {
        /// Statement file
        path: PathBuf,

        /// Declared media type (defaults to one derived from the file extension)
        #[arg(long)]
        media_type: Option<String>,

        /// Print the full analysis as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Skip named-entity annotation for documents
        #[arg(long)]
        no_entities: bool,

        /// Limit number of records printed in the table (default: 50)
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// List accepted media types
    Formats,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.tally/config.toml with defaults
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let level = cli.log_level.as_deref().unwrap_or(&cfg.log.level);
    logging::setup_logging(level)?;

    match cli.command {
        Command::Analyze {
            path,
            media_type,
            json,
            no_entities,
            limit,
        } => {
            let media_type = match media_type {
                Some(m) => m,
                None => match state::media_type_for(&path) {
                    Some(m) => m.to_string(),
                    None => bail!(
                        "cannot infer media type for {} (pass --media-type)",
                        path.display()
                    ),
                },
            };

            // Annotator resources load before any document is read.
            if cfg.entities.enabled && !no_entities {
                entities::init_annotator(&cfg.entities)?;
            }
            let annotator = entities::shared_annotator();

            let bytes = state::read_upload(&path)?;
            debug!(path = %path.display(), %media_type, "analyzing upload");

            let analysis = match analyze(bytes, &media_type, annotator).await {
                Ok(a) => a,
                Err(e) => bail!("Error processing file: {}: {}", e.kind(), e),
            };

            let as_json = json || cfg.output.format == OutputFormat::Json;
            if as_json {
                println!("{}", report::to_json(&analysis)?);
            } else {
                print!(
                    "{}",
                    report::render_table(&analysis, limit, cfg.output.narration_width)?
                );
            }
        }

        Command::Formats => {
            for f in SourceFormat::ALL {
                println!("{:<5} {}", f.extension(), f.media_type());
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}\n{}", config::config_path()?.display(), s);
            }
        },
    }

    Ok(())
}
