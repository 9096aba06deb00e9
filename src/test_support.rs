use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::core::{config::Settings, state::AppState};
use crate::exam::question::{ChoiceOption, QuestionDraft};
use crate::media::{MediaFile, MediaState, MediaUploader, UploadError};
use crate::store::{DocumentStore, Filter, MemoryDocumentStore, OrderBy, StoreError, StoredDocument};

pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|err| err.into_inner())
}

pub(crate) fn set_test_env() {
    std::env::set_var("EXAMDESK_ENV", "test");
    std::env::set_var("EXAMDESK_STRICT_CONFIG", "0");
    std::env::remove_var("ALLOWED_MEDIA_EXTENSIONS");
    std::env::remove_var("MAX_UPLOAD_SIZE_MB");
}

fn test_settings() -> Settings {
    set_test_env();
    Settings::load().expect("settings")
}

/// Uploader stub: issues deterministic-looking URLs, or fails every call.
pub(crate) struct StubUploader {
    fail: bool,
}

impl StubUploader {
    pub(crate) fn ok() -> Self {
        Self { fail: false }
    }

    pub(crate) fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl MediaUploader for StubUploader {
    async fn upload(&self, file: &MediaFile) -> Result<String, UploadError> {
        if self.fail {
            return Err(UploadError::Transport("connection refused".to_string()));
        }
        Ok(format!("https://cdn.example.com/media/{}-{}", Uuid::new_v4(), file.filename))
    }
}

/// Store wrapper that rejects every write, for save-failure paths.
pub(crate) struct FailingStore {
    inner: MemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.inner.query(collection, filters, order_by).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn add(&self, _collection: &str, _data: Value) -> Result<String, StoreError> {
        Err(StoreError::Rejected { status: 503, detail: "backend unavailable".to_string() })
    }

    async fn update(&self, _collection: &str, _id: &str, _patch: Value) -> Result<(), StoreError> {
        Err(StoreError::Rejected { status: 503, detail: "backend unavailable".to_string() })
    }
}

pub(crate) fn memory_state() -> (AppState, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let state =
        AppState::new(test_settings(), Arc::clone(&store) as Arc<dyn DocumentStore>, Arc::new(StubUploader::ok()));
    (state, store)
}

pub(crate) fn failing_upload_state() -> (AppState, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let state = AppState::new(
        test_settings(),
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(StubUploader::failing()),
    );
    (state, store)
}

pub(crate) fn failing_store_state() -> (AppState, Arc<FailingStore>) {
    let store = Arc::new(FailingStore { inner: MemoryDocumentStore::new() });
    let state = AppState::new(
        test_settings(),
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(StubUploader::ok()),
    );
    (state, store)
}

/// A multiple-choice draft that passes every validation rule.
pub(crate) fn valid_multiple_choice() -> QuestionDraft {
    QuestionDraft::MultipleChoice {
        question: "2 + 2 = ?".to_string(),
        options: vec![ChoiceOption::new("3"), ChoiceOption::new("4")],
        answer: "4".to_string(),
        media: MediaState::Absent,
    }
}

pub(crate) fn with_pending_media(mut question: QuestionDraft) -> QuestionDraft {
    *question.media_mut() =
        MediaState::PendingLocal(MediaFile::new("diagram.png", "image/png", vec![1, 2, 3]));
    question
}
