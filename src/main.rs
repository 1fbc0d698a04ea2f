use crate::domain::Board;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

mod commands;
mod domain;
mod extensions;
mod header;
mod loader;
mod template;
mod validation;

/// Prepares the credentials IoT devices are flashed with.
#[derive(Parser, Debug)]
#[command(name = "thingcfg", version, about)]
struct Cli {
    /// Log what is loaded and checked
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a record template for an operator to fill in
    Template {
        #[arg(long, value_enum)]
        board: Board,
        /// Defaults to stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Report whether a record is ready to be flashed
    Check {
        path: PathBuf,
        /// Also require the extension section of this board
        #[arg(long, value_enum)]
        board: Option<Board>,
    },
    /// Check every record in a directory
    CheckDir {
        directory: PathBuf,
        #[arg(long, default_value = "toml")]
        extension: String,
    },
    /// Render the secrets header the firmware includes
    Render {
        path: PathBuf,
        #[arg(long, value_enum)]
        board: Board,
        /// Defaults to stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", cli);

    let exit_code = match cli.command {
        Command::Template { board, out, force } => commands::write_template(board, out.as_deref(), force).await?,
        Command::Check { path, board } => commands::check(&path, board).await?,
        Command::CheckDir { directory, extension } => commands::check_dir(&directory, &extension).await?,
        Command::Render { path, board, out } => commands::write_header(&path, board, out.as_deref()).await?,
    };

    Ok(exit_code)
}
