mod error;
mod pem_block;
mod rules;
mod validator;

pub use error::ConfigError;
pub use validator::{ConfigStatus, validate, validate_for};
