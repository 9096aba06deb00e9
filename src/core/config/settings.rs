use super::parsing::{
    env_optional, env_or_default, is_supported_media_extension, parse_bool, parse_environment,
    parse_string_list, parse_u64, DEFAULT_MEDIA_EXTENSIONS,
};
use super::types::{
    ConfigError, MediaSettings, RuntimeSettings, Settings, StoreSettings, TelemetrySettings,
};

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            parse_environment(env_optional("EXAMDESK_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("EXAMDESK_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let store_base_url = env_or_default("DOCSTORE_BASE_URL", "http://localhost:8080/v1");
        let store_api_key = env_or_default("DOCSTORE_API_KEY", "");
        let store_timeout_seconds =
            parse_u64("DOCSTORE_TIMEOUT_SECONDS", env_or_default("DOCSTORE_TIMEOUT_SECONDS", "30"))?;

        let upload_url = env_or_default("MEDIA_UPLOAD_URL", "");
        let upload_preset = env_or_default("MEDIA_UPLOAD_PRESET", "");
        let media_timeout_seconds = parse_u64(
            "MEDIA_UPLOAD_TIMEOUT_SECONDS",
            env_or_default("MEDIA_UPLOAD_TIMEOUT_SECONDS", "120"),
        )?;
        let max_upload_size_mb =
            parse_u64("MAX_UPLOAD_SIZE_MB", env_or_default("MAX_UPLOAD_SIZE_MB", "10"))?;
        let allowed_extensions =
            parse_string_list(env_optional("ALLOWED_MEDIA_EXTENSIONS"), DEFAULT_MEDIA_EXTENSIONS);

        let log_level = env_or_default("EXAMDESK_LOG_LEVEL", "info");
        let json = env_optional("EXAMDESK_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            store: StoreSettings {
                base_url: store_base_url,
                api_key: store_api_key,
                timeout_seconds: store_timeout_seconds,
            },
            media: MediaSettings {
                upload_url,
                upload_preset,
                timeout_seconds: media_timeout_seconds,
                max_upload_size_mb,
                allowed_extensions,
            },
            telemetry: TelemetrySettings { log_level, json },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    pub fn store(&self) -> &StoreSettings {
        &self.store
    }

    pub fn media(&self) -> &MediaSettings {
        &self.media
    }

    pub fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.media.allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ALLOWED_MEDIA_EXTENSIONS",
                value: String::from("<empty>"),
            });
        }

        for extension in &self.media.allowed_extensions {
            if !is_supported_media_extension(extension) {
                return Err(ConfigError::InvalidValue {
                    field: "ALLOWED_MEDIA_EXTENSIONS",
                    value: extension.clone(),
                });
            }
        }

        if self.store.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DOCSTORE_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.store.api_key.is_empty() {
            return Err(ConfigError::MissingSetting("DOCSTORE_API_KEY"));
        }
        if self.media.upload_url.is_empty() {
            return Err(ConfigError::MissingSetting("MEDIA_UPLOAD_URL"));
        }
        if self.media.upload_preset.is_empty() {
            return Err(ConfigError::MissingSetting("MEDIA_UPLOAD_PRESET"));
        }

        Ok(())
    }
}
