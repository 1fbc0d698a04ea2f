use crate::domain::{Board, DeviceConfig, Field, ObjectStorage, TimeSync};
use crate::header::c_literal::{raw_literal, string_literal};
use crate::validation::{ConfigError, validate_for};
use thiserror::Error;
use tracing::{info, instrument};

const CERT_DELIMITER: &str = "EOF";
const KEY_DELIMITER: &str = "KEY";

/// Renders the secrets header the firmware of `board` includes.
///
/// The record is validated first; nothing is rendered for a record the device could not use.
#[instrument(skip_all, fields(device_id = config.device_id(), board = %board))]
pub fn render(config: &DeviceConfig, board: Board) -> Result<String, RenderError> {
    validate_for(config, board)?;

    let missing_extension = || ConfigError::MissingExtension {
        board,
        expected: board.extension_key(),
    };
    let header = match board {
        Board::Esp32Cam => render_esp32_cam(config, config.object_storage().ok_or_else(missing_extension)?)?,
        Board::Esp8266 => render_esp8266(config, config.time_sync().ok_or_else(missing_extension)?)?,
    };

    info!("🔐 Rendered {} header", board);
    Ok(header)
}

struct Pems {
    root_ca: String,
    device_cert: String,
    device_key: String,
}

impl Pems {
    fn new(config: &DeviceConfig) -> Result<Self, RenderError> {
        Ok(Pems {
            root_ca: raw_literal(config.root_ca_pem(), CERT_DELIMITER).ok_or(RenderError::RawLiteral(Field::RootCaPem))?,
            device_cert: raw_literal(config.device_cert_pem(), KEY_DELIMITER).ok_or(RenderError::RawLiteral(Field::DeviceCertPem))?,
            device_key: raw_literal(config.device_key_pem().expose(), KEY_DELIMITER).ok_or(RenderError::RawLiteral(Field::DeviceKeyPem))?,
        })
    }
}

fn render_esp32_cam(config: &DeviceConfig, storage: &ObjectStorage) -> Result<String, RenderError> {
    let pems = Pems::new(config)?;

    Ok(format!(
        r#"// Generated by thingcfg for {device_id}. Holds credentials, keep it out of version control.
#include <pgmspace.h>

#define SECRET
#define THINGNAME {thing_name}

const char WIFI_SSID[] = {ssid};
const char WIFI_PASSWORD[] = {password};
const char AWS_IOT_ENDPOINT[] = {endpoint};
const char *AWS_S3_BUCKET_NAME = {bucket};
const char *AWS_REGION = {region};
const char *AWS_ACCESS_KEY_ID = {access_key};
const char *AWS_SECRET_ACCESS_KEY = {secret_key};

const char *getPreSignedURL = {presigned_url};

// Root CA
static const char AWS_CERT_CA[] PROGMEM = {root_ca};

// Device Certificate
static const char AWS_CERT_CRT[] PROGMEM = {device_cert};

// Device Private Key
static const char AWS_CERT_PRIVATE[] PROGMEM = {device_key};
"#,
        device_id = config.device_id(),
        thing_name = string_literal(config.device_id()),
        ssid = string_literal(config.ssid()),
        password = string_literal(config.password().expose()),
        endpoint = string_literal(config.iot_endpoint()),
        bucket = string_literal(storage.bucket()),
        region = string_literal(storage.region()),
        access_key = string_literal(storage.access_key()),
        secret_key = string_literal(storage.secret_key().expose()),
        presigned_url = string_literal(storage.presigned_url_endpoint()),
        root_ca = pems.root_ca,
        device_cert = pems.device_cert,
        device_key = pems.device_key,
    ))
}

fn render_esp8266(config: &DeviceConfig, time_sync: &TimeSync) -> Result<String, RenderError> {
    let utc_offset_hours = time_sync.utc_offset_hours().ok_or(ConfigError::Unconfigured {
        fields: vec![Field::UtcOffsetHours],
    })?;
    let pems = Pems::new(config)?;

    Ok(format!(
        r#"// Generated by thingcfg for {device_id}. Holds credentials, keep it out of version control.
#include <pgmspace.h>

#define SECRET

const char ssid[] = {ssid};
const char pass[] = {password};

#define THINGNAME {thing_name}

int8_t TIME_ZONE = {utc_offset_hours};

const char MQTT_HOST[] = {endpoint};

// Root CA
static const char cacert[] PROGMEM = {root_ca};

// Device Certificate
static const char client_cert[] PROGMEM = {device_cert};

// Device Private Key
static const char privkey[] PROGMEM = {device_key};
"#,
        device_id = config.device_id(),
        ssid = string_literal(config.ssid()),
        password = string_literal(config.password().expose()),
        thing_name = string_literal(config.device_id()),
        utc_offset_hours = utc_offset_hours,
        endpoint = string_literal(config.iot_endpoint()),
        root_ca = pems.root_ca,
        device_cert = pems.device_cert,
        device_key = pems.device_key,
    ))
}

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} cannot be embedded in a raw string literal")]
    RawLiteral(Field),
}
