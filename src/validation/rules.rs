use crate::domain::Field;
use crate::validation::pem_block::{self, PemKind};
use url::{Host, Url};

const MAX_SSID_BYTES: usize = 32;
const MAX_DEVICE_ID_CHARS: usize = 128;
const UTC_OFFSET_RANGE: std::ops::RangeInclusive<i8> = -12..=14;

/// Checks the shape of a filled in text value. Placeholders are handled before this runs.
pub fn check(field: Field, value: &str) -> Result<(), String> {
    match field {
        Field::Ssid => ssid(value),
        Field::Password => passphrase(value),
        Field::DeviceId => device_id(value),
        Field::IotEndpoint => endpoint_host(value),
        Field::RootCaPem => pem(value, PemKind::CERTIFICATE_CHAIN),
        Field::DeviceCertPem => pem(value, PemKind::CERTIFICATE),
        Field::DeviceKeyPem => pem(value, PemKind::PRIVATE_KEY),
        Field::StorageRegion => region(value),
        Field::StorageBucket => bucket(value),
        Field::StorageAccessKey | Field::StorageSecretKey => no_whitespace(value),
        Field::PresignedUrlEndpoint => https_url(value),
        Field::UtcOffsetHours => value
            .parse::<i8>()
            .map_err(|_| format!("`{}` is not a whole number of hours", value))
            .and_then(utc_offset),
    }
}

pub fn utc_offset(hours: i8) -> Result<(), String> {
    if UTC_OFFSET_RANGE.contains(&hours) {
        Ok(())
    } else {
        Err(format!(
            "{} is outside {}..={} hours",
            hours,
            UTC_OFFSET_RANGE.start(),
            UTC_OFFSET_RANGE.end()
        ))
    }
}

fn ssid(value: &str) -> Result<(), String> {
    if value.len() > MAX_SSID_BYTES {
        return Err(format!("must be at most {} bytes, got {}", MAX_SSID_BYTES, value.len()));
    }
    Ok(())
}

// WPA2 personal: 8 to 63 printable characters or a raw 64 digit hex key
fn passphrase(value: &str) -> Result<(), String> {
    let chars = value.chars().count();
    if (8..=63).contains(&chars) || (value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())) {
        Ok(())
    } else {
        Err(format!("must be 8 to 63 characters or 64 hex digits, got {} characters", chars))
    }
}

fn device_id(value: &str) -> Result<(), String> {
    if value.chars().count() > MAX_DEVICE_ID_CHARS {
        return Err(format!("must be at most {} characters", MAX_DEVICE_ID_CHARS));
    }
    match value.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'))) {
        Some(c) => Err(format!("contains `{}`, only letters, digits, `:`, `_` and `-` are allowed", c)),
        None => Ok(()),
    }
}

fn endpoint_host(value: &str) -> Result<(), String> {
    match Host::parse(value) {
        Ok(Host::Domain(domain)) if domain.contains('.') => Ok(()),
        Ok(Host::Domain(_)) => Err(format!("`{}` is not a fully qualified DNS name", value)),
        Ok(Host::Ipv4(_) | Host::Ipv6(_)) => Err("must be a DNS name, the broker certificate is issued for a hostname".to_string()),
        Err(e) => Err(format!("`{}` is not a bare hostname ({})", value, e)),
    }
}

fn pem(value: &str, kind: PemKind) -> Result<(), String> {
    pem_block::inspect(value, kind).map(|_| ()).map_err(|e| e.to_string())
}

fn region(value: &str) -> Result<(), String> {
    if value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        Ok(())
    } else {
        Err(format!("`{}` is not a region code such as us-east-1", value))
    }
}

fn bucket(value: &str) -> Result<(), String> {
    let valid_chars = value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let valid_edges = value.starts_with(|c: char| c.is_ascii_alphanumeric()) && value.ends_with(|c: char| c.is_ascii_alphanumeric());

    if (3..=63).contains(&value.len()) && valid_chars && valid_edges {
        Ok(())
    } else {
        Err(format!(
            "`{}` must be 3 to 63 lowercase letters, digits, dots or hyphens, starting and ending with a letter or digit",
            value
        ))
    }
}

fn no_whitespace(value: &str) -> Result<(), String> {
    if value.chars().any(char::is_whitespace) {
        Err("must not contain whitespace".to_string())
    } else {
        Ok(())
    }
}

fn https_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("`{}` is not a URL ({})", value, e))?;
    if url.scheme() != "https" {
        return Err(format!("must use https, got {}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("has no host".to_string());
    }
    Ok(())
}
