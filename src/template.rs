use crate::domain::{Board, DeviceConfig, Extension, Field, ObjectStorage, Secret, TimeSync};

const DEFAULT_UTC_OFFSET_HOURS: i8 = 8;

/// Header written above a template so the operator knows what to do with it.
pub const TEMPLATE_PREAMBLE: &str = "\
# Replace every placeholder below, then run `thingcfg check` on this file.
# Certificates and the private key are pasted as-is between the triple quotes.
";

/// The record an operator starts from. Every text value is a placeholder.
pub fn template(board: Board) -> DeviceConfig {
    let extension = match board {
        Board::Esp32Cam => Extension::ObjectStorage(ObjectStorage {
            region: placeholder(Field::StorageRegion),
            bucket: placeholder(Field::StorageBucket),
            access_key: placeholder(Field::StorageAccessKey),
            secret_key: Secret::new(placeholder(Field::StorageSecretKey)),
            presigned_url_endpoint: placeholder(Field::PresignedUrlEndpoint),
        }),
        Board::Esp8266 => Extension::TimeSync(TimeSync {
            utc_offset_hours: Some(DEFAULT_UTC_OFFSET_HOURS),
        }),
    };

    DeviceConfig {
        ssid: placeholder(Field::Ssid),
        password: Secret::new(placeholder(Field::Password)),
        device_id: placeholder(Field::DeviceId),
        iot_endpoint: placeholder(Field::IotEndpoint),
        root_ca_pem: placeholder(Field::RootCaPem),
        device_cert_pem: placeholder(Field::DeviceCertPem),
        device_key_pem: Secret::new(placeholder(Field::DeviceKeyPem)),
        extension: Some(extension),
    }
}

/// The template as TOML, ready to be written to disk.
pub fn template_toml(board: Board) -> Result<String, toml::ser::Error> {
    Ok(format!("{}\n{}", TEMPLATE_PREAMBLE, template(board).to_toml()?))
}

fn placeholder(field: Field) -> String {
    field.placeholders().first().map(|p| p.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ConfigError, validate};
    use pretty_assertions::assert_eq;

    #[test]
    fn camera_template_leaves_every_field_unconfigured() {
        let config = template(Board::Esp32Cam);

        let err = validate(&config).unwrap_err();

        assert_eq!(
            err,
            ConfigError::Unconfigured {
                fields: vec![
                    Field::Ssid,
                    Field::Password,
                    Field::DeviceId,
                    Field::IotEndpoint,
                    Field::RootCaPem,
                    Field::DeviceCertPem,
                    Field::DeviceKeyPem,
                    Field::StorageRegion,
                    Field::StorageBucket,
                    Field::StorageAccessKey,
                    Field::StorageSecretKey,
                    Field::PresignedUrlEndpoint,
                ]
            }
        );
    }

    #[test]
    fn esp8266_template_carries_a_time_offset() {
        let config = template(Board::Esp8266);

        assert_eq!(config.time_sync().and_then(TimeSync::utc_offset_hours), Some(8));
        assert_eq!(config.object_storage(), None);
    }

    #[test]
    fn toml_template_parses_back_to_the_template() {
        let toml = template_toml(Board::Esp32Cam).unwrap();

        assert!(toml.starts_with(TEMPLATE_PREAMBLE));
        assert!(toml.contains("[extension.object_storage]"));
        assert_eq!(toml::from_str::<DeviceConfig>(&toml).unwrap(), template(Board::Esp32Cam));
    }
}
