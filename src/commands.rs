use crate::domain::{Board, DeviceConfig, Extension};
use crate::extensions::path_ext::FileName;
use crate::header::{RenderError, render};
use crate::loader::{LoaderError, load_device, load_devices_from};
use crate::template::template_toml;
use crate::validation::{ConfigStatus, validate, validate_for};
use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tokio::{fs, task};
use tracing::{debug, info, instrument, warn};

#[instrument]
pub async fn write_template(board: Board, out: Option<&Path>, force: bool) -> Result<ExitCode, CommandError> {
    let toml = template_toml(board)?;

    match out {
        Some(path) => {
            if !force && fs::try_exists(path).await.map_err(|e| io_error(e, path))? {
                return Err(CommandError::AlreadyExists(path.to_path_buf()));
            }
            fs::write(path, toml).await.map_err(|e| io_error(e, path))?;
            info!("📝 Wrote {} template to '{}'", board, path.display());
        }
        None => print!("{}", toml),
    }

    Ok(ExitCode::SUCCESS)
}

#[instrument]
pub async fn check(path: &Path, board: Option<Board>) -> Result<ExitCode, CommandError> {
    let config = load(path).await?;

    let status = ConfigStatus::from(match board {
        Some(board) => validate_for(&config, board),
        None => validate(&config),
    });
    println!("{}: {}", path.string_file_name(), status);

    debug!("Extension: {:?}", config.extension().map(Extension::key));
    if let ConfigStatus::Rejected(err) = &status {
        debug!("Fields to revisit: {:?}", err.fields());
    }
    if let Some(local_time) = config.time_sync().and_then(|time_sync| time_sync.local_time(Utc::now())) {
        info!("🕗 Device clock will read {}", local_time.format("%Y-%m-%d %H:%M %:z"));
    }

    Ok(exit_code(&status))
}

#[instrument]
pub async fn check_dir(directory: &Path, extension: &str) -> Result<ExitCode, CommandError> {
    let devices = load_devices_from(directory, extension).await?;

    let mut configured = 0;
    for device in &devices {
        let line = match &device.result {
            Ok(config) => {
                let status = ConfigStatus::from(validate(config));
                if status.is_configured() {
                    configured += 1;
                }
                status.to_string()
            }
            Err(err) => format!("unreadable: {}", err),
        };
        println!("{}: {}", device.path.string_file_name(), line);
    }

    let rejected = devices.len() - configured;
    println!("{} configured, {} rejected", configured, rejected);

    Ok(if rejected == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[instrument]
pub async fn write_header(path: &Path, board: Board, out: Option<&Path>) -> Result<ExitCode, CommandError> {
    let config = load(path).await?;

    let header = match render(&config, board) {
        Ok(header) => header,
        Err(RenderError::Config(err)) => {
            println!("{}: {}", path.string_file_name(), ConfigStatus::Rejected(err));
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    match out {
        Some(out) => {
            fs::write(out, header).await.map_err(|e| io_error(e, out))?;
            warn!("⚠️ '{}' contains credentials, keep it out of version control", out.display());
        }
        None => print!("{}", header),
    }

    Ok(ExitCode::SUCCESS)
}

async fn load(path: &Path) -> Result<DeviceConfig, LoaderError> {
    let path = path.to_path_buf();
    task::spawn_blocking(move || load_device(&path)).await?
}

fn exit_code(status: &ConfigStatus) -> ExitCode {
    if status.is_configured() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn io_error(source: io::Error, path: &Path) -> CommandError {
    CommandError::Io {
        source,
        path: path.to_path_buf(),
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("could not serialize the template: {0}")]
    Template(#[from] toml::ser::Error),
    #[error("'{}': {}", path.display(), source)]
    Io { source: io::Error, path: PathBuf },
    #[error("'{}' already exists, pass --force to overwrite it", .0.display())]
    AlreadyExists(PathBuf),
}
