mod device_loader;
mod loader;

pub use device_loader::load_device;
pub use loader::{LoaderError, load_devices_from};
