//! # gitds
//!
//! **gitds** imports the git history of one file as dataset versions.
//!
//! Features:
//! - `gitds import <DATASET> <FILE>` replays every commit of `FILE` (relative
//!   to the current directory, which must be a git working tree) into `me/<DATASET>`
//! - `gitds log <DATASET>` lists the stored versions, oldest first
//! - `gitds show <DATASET>` prints the body of a version
//! - `gitds home` prints the store root (`$GITDS_PATH`, else `~/.gitds`)
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{Parser, Subcommand};
use gitds::{cmd_import, cmd_log, cmd_show, gitds_home};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "gitds",
    version,
    about = "gitds - replay a file's git history into a versioned dataset",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Cmd {
    /// Import every revision of FILE as a version of DATASET
    Import {
        /// Destination dataset name
        dataset: String,
        /// File to import, relative to the current directory
        file: String,
    },
    /// List the versions of a dataset
    Log { dataset: String },
    /// Print the body of a dataset version
    Show {
        dataset: String,
        /// Version index as shown by `log` (defaults to the latest)
        #[arg(long)]
        version: Option<usize>,
    },
    /// Print the store root directory
    Home,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Import { dataset, file } => cmd_import(&dataset, &file),
        Cmd::Log { dataset } => cmd_log(&dataset),
        Cmd::Show { dataset, version } => cmd_show(&dataset, version),
        Cmd::Home => {
            println!("{}", gitds_home()?.display());
            Ok(())
        }
    }
}
