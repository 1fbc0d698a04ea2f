use crate::domain::{Board, DeviceConfig, Field};
use crate::validation::error::{ConfigError, Issue};
use crate::validation::{pem_block, rules};
use std::fmt;
use tracing::{debug, instrument};

/// Outcome of checking a record, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigStatus {
    Configured,
    Rejected(ConfigError),
}

impl ConfigStatus {
    pub fn is_configured(&self) -> bool {
        matches!(self, ConfigStatus::Configured)
    }
}

impl From<Result<(), ConfigError>> for ConfigStatus {
    fn from(result: Result<(), ConfigError>) -> Self {
        match result {
            Ok(()) => ConfigStatus::Configured,
            Err(err) => ConfigStatus::Rejected(err),
        }
    }
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigStatus::Configured => f.write_str("configured"),
            ConfigStatus::Rejected(err) => write!(f, "{}", err),
        }
    }
}

/// Rejects records that still hold template values or values the device cannot use.
///
/// Empty and placeholder values are reported first and on their own: an operator who has not
/// filled in a field does not need to hear that the placeholder is also malformed.
#[instrument(skip_all, fields(device_id = config.device_id()))]
pub fn validate(config: &DeviceConfig) -> Result<(), ConfigError> {
    let fields = config.text_fields();

    let mut unconfigured: Vec<Field> = fields
        .iter()
        .filter(|(field, value)| is_unconfigured(*field, value))
        .map(|(field, _)| *field)
        .collect();
    if config.time_sync().is_some_and(|time_sync| time_sync.utc_offset_hours().is_none()) {
        unconfigured.push(Field::UtcOffsetHours);
    }
    if !unconfigured.is_empty() {
        debug!("Unconfigured fields: {:?}", unconfigured);
        return Err(ConfigError::Unconfigured { fields: unconfigured });
    }

    let mut issues: Vec<Issue> = fields
        .iter()
        .filter_map(|(field, value)| rules::check(*field, value).err().map(|reason| Issue::new(*field, reason)))
        .collect();
    if let Some(hours) = config.time_sync().and_then(|time_sync| time_sync.utc_offset_hours()) {
        if let Err(reason) = rules::utc_offset(hours) {
            issues.push(Issue::new(Field::UtcOffsetHours, reason));
        }
    }
    if !issues.is_empty() {
        debug!("Invalid fields: {:?}", issues.iter().map(|issue| issue.field).collect::<Vec<_>>());
        return Err(ConfigError::Invalid { issues });
    }

    debug!("Record is configured");
    Ok(())
}

/// Like [`validate`], but also requires the extension section `board` consumes.
pub fn validate_for(config: &DeviceConfig, board: Board) -> Result<(), ConfigError> {
    let has_extension = match board {
        Board::Esp32Cam => config.object_storage().is_some(),
        Board::Esp8266 => config.time_sync().is_some(),
    };
    if !has_extension {
        return Err(ConfigError::MissingExtension {
            board,
            expected: board.extension_key(),
        });
    }

    validate(config)
}

pub fn is_unconfigured(field: Field, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    if field.is_pem() {
        return pem_block::is_unfilled(value);
    }
    field.placeholders().iter().any(|placeholder| placeholder.eq_ignore_ascii_case(value))
}
