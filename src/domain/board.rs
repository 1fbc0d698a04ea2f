use clap::ValueEnum;
use std::fmt;

/// The hardware a record is flashed onto. Each board consumes exactly one extension section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Board {
    /// ESP32 camera module, uploads captures to object storage.
    #[value(name = "esp32-cam")]
    Esp32Cam,
    /// ESP8266 module, timestamps messages in local time.
    #[value(name = "esp8266")]
    Esp8266,
}

impl Board {
    pub fn name(&self) -> &'static str {
        match self {
            Board::Esp32Cam => "esp32-cam",
            Board::Esp8266 => "esp8266",
        }
    }

    /// Key of the extension section this board needs.
    pub fn extension_key(&self) -> &'static str {
        match self {
            Board::Esp32Cam => "object_storage",
            Board::Esp8266 => "time_sync",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
