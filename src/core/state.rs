use std::sync::Arc;

use crate::core::config::Settings;
use crate::media::MediaUploader;
use crate::store::DocumentStore;

/// Shared handles the hosting shell threads through every controller and
/// service: configuration plus the two external collaborators.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    store: Arc<dyn DocumentStore>,
    uploader: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        store: Arc<dyn DocumentStore>,
        uploader: Arc<dyn MediaUploader>,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, store, uploader }) }
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    pub fn uploader(&self) -> &Arc<dyn MediaUploader> {
        &self.inner.uploader
    }
}
