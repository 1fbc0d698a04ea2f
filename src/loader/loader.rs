use crate::domain::DeviceConfig;
use crate::extensions::path_ext::{FileName, LocalOverride};
use crate::loader::device_loader::load_device_file;
use futures::stream::FuturesUnordered;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task::JoinError;
use tokio::{fs, task};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReadDirStream;
use tracing::{info, instrument, warn};

/// A record file and what came out of loading it.
#[derive(Debug)]
pub struct LoadedDevice {
    pub path: PathBuf,
    pub result: Result<DeviceConfig, LoaderError>,
}

/// Loads every record in `directory` with the given extension, sorted by path.
/// A file that fails to load is reported in its own entry and does not stop the others.
#[instrument]
pub async fn load_devices_from(directory: &Path, extension: &str) -> Result<Vec<LoadedDevice>, LoaderError> {
    info!("📁 Loading device records...");
    let files = list_files(directory, extension).await.map_err(|e| LoaderError::Io {
        source: e,
        path: Some(directory.to_path_buf()),
    })?;

    let mut devices = load_files(files).await;
    devices.sort_by(|a, b| a.path.cmp(&b.path));

    let failed = devices.iter().filter_map(|device| device.result.as_ref().err().map(|e| (&device.path, e))).collect::<Vec<_>>();
    for (path, error) in &failed {
        warn!("⚠️ Failed to load '{}': {}", path.string_file_name(), error);
    }

    info!("📁 Loading device records... OK, {} loaded, {} failed", devices.len() - failed.len(), failed.len());
    Ok(devices)
}

#[instrument]
async fn list_files(directory: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let dir = fs::read_dir(directory).await?;
    let mut entries = ReadDirStream::new(dir);

    while let Some(entry) = entries.next().await {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) && !path.is_local_override() {
                    files.push(path);
                }
            }
            Err(err) => warn!("⚠️ Unable to read directory entry: {}", err),
        }
    }

    Ok(files)
}

#[instrument(skip_all)]
async fn load_files(paths: Vec<PathBuf>) -> Vec<LoadedDevice> {
    FuturesUnordered::from_iter(paths.into_iter().map(|path| async move {
        let blocking_path = path.clone();
        let result = match task::spawn_blocking(move || load_device_file(&blocking_path)).await {
            Ok(result) => result,
            Err(err) => Err(LoaderError::JoinError(err)),
        };
        LoadedDevice { path, result }
    }))
    .collect()
    .await
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("{}", source)]
    Config { source: config::ConfigError, path: PathBuf },
    #[error("{}", source)]
    Io { source: io::Error, path: Option<PathBuf> },
    #[error(transparent)]
    JoinError(#[from] JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use test_log::test;

    fn resources() -> PathBuf {
        PathBuf::from(format!("{}/tests/resources/devices", env!("CARGO_MANIFEST_DIR")))
    }

    #[tokio::test]
    async fn list_files_skips_other_extensions_and_local_overrides() -> io::Result<()> {
        let dir = temp_dir().join(format!("thingcfg-list-files-{}", std::process::id()));
        fs::create_dir_all(&dir).await?;

        let device1 = dir.join("cam-01.toml");
        let device2 = dir.join("plug-01.toml");
        fs::write(&device1, "").await?;
        fs::write(&dir.join("cam-01_local.toml"), "").await?;
        fs::write(&dir.join("notes.txt"), "text").await?;
        fs::write(&device2, "").await?;

        let mut files = list_files(&dir, "toml").await?;
        files.sort();

        assert_eq!(files, vec![device1, device2]);

        Ok(())
    }

    #[test(tokio::test)]
    async fn loads_every_record_in_a_directory() -> Result<(), LoaderError> {
        let devices = load_devices_from(&resources(), "toml").await?;

        let names = devices.iter().map(|d| d.path.string_file_name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["broken.toml", "cam-01.toml", "plug-01.toml", "unnamed.toml"]);

        assert!(matches!(devices[0].result, Err(LoaderError::Config { .. })));
        let device_ids = devices[1..]
            .iter()
            .map(|d| d.result.as_ref().map(|c| c.device_id().to_string()).unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(device_ids, vec!["cam-01", "plug-01", "THING NAME from AWS IoT Core"]);

        Ok(())
    }

    #[test(tokio::test)]
    async fn fails_for_a_missing_directory() {
        let result = load_devices_from(&resources().join("missing"), "toml").await;

        assert!(matches!(result, Err(LoaderError::Io { path: Some(_), .. })));
    }
}
