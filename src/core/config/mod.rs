mod parsing;
mod settings;
mod types;

pub use types::{
    ConfigError, Environment, MediaSettings, RuntimeSettings, Settings, StoreSettings,
    TelemetrySettings,
};
