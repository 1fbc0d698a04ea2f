mod board;
mod device_config;
mod field;
mod secret;

pub use board::Board;
#[cfg(test)]
pub use device_config::{DEVICE_CERT_PEM, DEVICE_KEY_PEM, DeviceConfigBuilder, ROOT_CA_PEM};
pub use device_config::{DeviceConfig, Extension, ObjectStorage, TimeSync};
pub use field::Field;
pub use secret::Secret;
