use std::env;

use super::types::{ConfigError, Environment};

pub(super) const DEFAULT_MEDIA_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "gif", "mp4", "webm"];

pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub(super) fn parse_environment(value: Option<String>) -> Environment {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("prod") | Some("production") => Environment::Production,
        Some("staging") => Environment::Staging,
        Some("test") | Some("testing") => Environment::Test,
        _ => Environment::Development,
    }
}

pub(super) fn parse_string_list(value: Option<String>, defaults: &[&str]) -> Vec<String> {
    let Some(raw) = value else {
        return defaults.iter().map(|item| item.to_string()).collect();
    };

    let parsed: Vec<String> = raw
        .split(',')
        .map(|item| item.trim().to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect();

    if parsed.is_empty() {
        defaults.iter().map(|item| item.to_string()).collect()
    } else {
        parsed
    }
}

pub(super) fn is_supported_media_extension(extension: &str) -> bool {
    DEFAULT_MEDIA_EXTENSIONS.contains(&extension)
}
