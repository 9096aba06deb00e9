use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Settings {
    pub(super) runtime: RuntimeSettings,
    pub(super) store: StoreSettings,
    pub(super) media: MediaSettings,
    pub(super) telemetry: TelemetrySettings,
}

/// Connection details for the external document database.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Connection details for the external media upload endpoint.
#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub upload_url: String,
    pub upload_preset: String,
    pub timeout_seconds: u64,
    pub max_upload_size_mb: u64,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub log_level: String,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub environment: Environment,
    pub strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Test => "test",
        }
    }

    pub(super) fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),
}
