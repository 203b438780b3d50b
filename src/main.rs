mod generate;
mod preview;

use std::{fs::File, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Parser)]
#[command(version, about = "Turns an image into text_display summon commands")]
struct Arguments {
    /// TOML file naming the image, output file, scale and anchor
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log file, cleared at the start of every run
    #[arg(long, default_value = "latest.log", global = true)]
    log_file: PathBuf,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write one summon command per opaque pixel to the configured output file
    Generate,

    /// Print the rasterized color grid
    Preview,
}

fn main() -> ExitCode {
    let arguments = match Arguments::try_parse() {
        Ok(arguments) => arguments,
        Err(error) => {
            let _ = error.print();
            // --help and --version also arrive here and are not failures
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let subscriber = match build_subscriber(&arguments) {
        Ok(subscriber) => subscriber,
        Err(error) => {
            eprintln!("unable to set up logging: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    tracing::subscriber::with_default(subscriber, || {
        debug!("running {:?}", arguments.command);
        let result = match arguments.command {
            Commands::Generate => generate::generate(&arguments.config),
            Commands::Preview => preview::preview(&arguments.config),
        };
        match result {
            Ok(()) => {
                info!("done");
                ExitCode::SUCCESS
            }
            Err(error) => {
                error!("{error}");
                ExitCode::FAILURE
            }
        }
    })
}

fn build_subscriber(
    arguments: &Arguments,
) -> anyhow::Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let log_file = File::create(&arguments.log_file)
        .with_context(|| format!("failed to create log file {}", arguments.log_file.display()))?;

    let default_level = if arguments.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    Ok(Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        ))
}
