use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scriptorium")]
#[command(about = "Zefania Bible corpus acquisition and CSV conversion tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract archive download links from a saved SourceForge listing page
    Links {
        /// Saved HTML listing page
        #[arg(short, long)]
        input: PathBuf,

        /// Output file, one link per line
        #[arg(short, long, default_value = "links.txt")]
        output: PathBuf,
    },

    /// Turn a link list into curl download commands
    Curl {
        /// Link list file (one URL per line)
        #[arg(short, long, default_value = "links.txt")]
        input: PathBuf,

        /// Output file, one curl command per line
        #[arg(short, long, default_value = "curl-commands.txt")]
        output: PathBuf,
    },

    /// Download every archive in a link list
    Fetch {
        /// Link list file (one URL per line)
        #[arg(short, long, default_value = "links.txt")]
        input: PathBuf,

        /// Directory for the downloaded archives and manifest.json
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Unzip all archives in a directory and decode their names
    Extract {
        /// Directory containing the .zip archives
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Convert all Zefania XML documents in a directory to CSV records
    Convert {
        /// Working directory containing the .xml documents
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Also write the batch report as JSON to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(
                time_format.to_string(),
            ))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
                time_format.to_string(),
            ))
            .init();
    }

    match cli.command {
        Commands::Links { input, output } => {
            tracing::info!(input = %input.display(), "Extracting download links");
            let count = scriptorium_acquire::links::links_from_file(&input, &output)?;
            tracing::info!(links = count, path = %output.display(), "Done");
        }

        Commands::Curl { input, output } => {
            tracing::info!(input = %input.display(), "Generating curl commands");
            let count = scriptorium_acquire::download::write_curl_commands(&input, &output)?;
            tracing::info!(commands = count, path = %output.display(), "Done");
        }

        Commands::Fetch { input, output_dir } => {
            tracing::info!(input = %input.display(), "Fetching archives");
            let manifest =
                scriptorium_acquire::fetch::fetch_archives(&input, &output_dir).await?;
            tracing::info!(
                archives = manifest.archives.len(),
                dir = %output_dir.display(),
                "Done"
            );
        }

        Commands::Extract { dir } => {
            tracing::info!(dir = %dir.display(), "Extracting archives");
            let report = scriptorium_acquire::archive::extract_archives(&dir)?;
            tracing::info!(
                extracted = report.extracted.len(),
                skipped = report.skipped.len(),
                "Done"
            );
        }

        Commands::Convert { dir, report } => {
            tracing::info!(dir = %dir.display(), "Converting documents");
            let batch = scriptorium_convert::run(&dir)?;

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&batch)?;
                std::fs::write(&report_path, &json)?;
                tracing::info!(path = %report_path.display(), "Wrote batch report");
            }

            // Per-document failures are logged, not escalated: the batch
            // itself completed, so the exit code stays zero.
            tracing::info!(
                converted = batch.converted(),
                failed = batch.failed(),
                "Done"
            );
        }
    }

    Ok(())
}
