use crate::domain::DeviceConfig;
use crate::extensions::path_ext::LocalOverride;
use crate::loader::LoaderError;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::{debug, instrument};

/// Environment variables overriding record values start with this, e.g. `THINGCFG__PASSWORD`.
pub const ENV_PREFIX: &str = "THINGCFG";
const ENV_SEPARATOR: &str = "__";

/// Loads a record from `path`, its `_local` sibling if present, and `THINGCFG__*` variables.
pub fn load_device(path: &Path) -> Result<DeviceConfig, LoaderError> {
    load_device_with(path, Some(environment()))
}

/// Loads a record from `path` and its `_local` sibling only.
pub fn load_device_file(path: &Path) -> Result<DeviceConfig, LoaderError> {
    load_device_with(path, None)
}

pub(crate) fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
}

#[instrument(skip(environment))]
pub(crate) fn load_device_with(path: &Path, environment: Option<Environment>) -> Result<DeviceConfig, LoaderError> {
    let local_override = path.local_override();
    debug!("Local override: {}", local_override.display());

    let mut builder = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(File::from(local_override.as_path()).required(false));
    if let Some(environment) = environment {
        builder = builder.add_source(environment);
    }

    builder
        .build()
        .and_then(|config| config.try_deserialize::<DeviceConfig>())
        .map_err(|source| LoaderError::Config {
            source,
            path: path.to_path_buf(),
        })
}
