pub mod core;
pub mod exam;
pub mod media;
pub mod schemas;
pub mod services;
pub mod store;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::media::HttpMediaUploader;
use crate::store::RestDocumentStore;

/// Wire the application core against the remote collaborators: load settings
/// from the environment, initialize tracing, and build the HTTP clients for
/// the document store and the media endpoint.
///
/// Hosting shells that bring their own collaborators (tests, offline tools)
/// construct [`AppState`] directly instead.
pub fn bootstrap() -> anyhow::Result<AppState> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    let store = RestDocumentStore::from_settings(&settings)?;
    let uploader = HttpMediaUploader::from_settings(&settings)?;

    tracing::info!(
        environment = %settings.runtime().environment.as_str(),
        "examdesk core ready"
    );

    Ok(AppState::new(settings, Arc::new(store), Arc::new(uploader)))
}
