//! MOSS client CLI binary.
//!
//! # Commands
//!
//! - `submit` - Upload files and print the report location
//! - `languages` - List accepted language tags
//! - `config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use moss::{config::ClientConfig, protocol::Language, MossClient, VERSION};

#[derive(Parser)]
#[command(name = "moss")]
#[command(version = VERSION)]
#[command(about = "Submit source files to the MOSS similarity detection service", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/moss/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files and print the report location
    Submit {
        /// Submission files, numbered 1..N in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language of the submitted files
        #[arg(short, long)]
        language: String,

        /// MOSS user id (or env MOSS_ID)
        #[arg(short, long)]
        user_id: Option<String>,

        /// Base file; matches against it are never reported (repeatable)
        #[arg(short, long = "base")]
        base: Vec<PathBuf>,

        /// Comment attached to the report
        #[arg(short, long, default_value = "")]
        comment: String,

        /// Number of matching files to show
        #[arg(short = 'n', long, default_value = "250")]
        show: u32,

        /// Ignore passages appearing in more than this many programs
        #[arg(short = 'm', long, default_value = "10")]
        ignore_limit: u32,

        /// Group submissions by directory
        #[arg(short, long)]
        directory: bool,

        /// Use the experimental matcher
        #[arg(short = 'x', long)]
        experimental: bool,

        /// Print the result (with skipped files) as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List accepted language tags
    Languages,

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Submit {
            files,
            language,
            user_id,
            base,
            comment,
            show,
            ignore_limit,
            directory,
            experimental,
            json,
            verbose,
        } => {
            init_logging(verbose);

            let user_id = user_id
                .or_else(|| config.user_id.clone())
                .context("No MOSS user id: pass --user-id or set MOSS_ID")?;

            let mut client = MossClient::new(&language, user_id)?.with_config(config);
            client
                .set_comment(comment)
                .set_num_matching_files(show)
                .set_ignore_limit(ignore_limit)
                .set_directory_mode(directory)
                .set_experimental(experimental);

            for path in base {
                let description = describe(&path);
                client.add_base_file(path, description)?;
            }
            for path in files {
                let description = describe(&path);
                client.add_file(path, description)?;
            }

            cmd_submit(client, json)
        },

        Commands::Languages => {
            for lang in Language::ALL {
                println!("{}", lang);
            }
            Ok(())
        },

        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        },
    }
}

fn cmd_submit(client: MossClient, json: bool) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let submission = runtime
        .block_on(client.process())
        .context("MOSS submission failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
    } else {
        for skipped in &submission.skipped {
            eprintln!("skipped {}: {}", skipped.description, skipped.reason);
        }
        println!("{}", submission.url);
    }
    Ok(())
}

/// File config (explicit or default location) overlaid with the environment.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ClientConfig> {
    let file_config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => match ClientConfig::default_path().filter(|p| p.exists()) {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        },
    };
    Ok(file_config.merge(ClientConfig::from_env()))
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

/// Report label for a path: the path as given, spaces replaced.
fn describe(path: &std::path::Path) -> String {
    path.to_string_lossy().replace(' ', "_")
}
