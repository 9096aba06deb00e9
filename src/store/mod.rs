use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

mod memory;
mod rest;

pub use memory::MemoryDocumentStore;
pub use rest::RestDocumentStore;

/// Collection names used by this application in the external document
/// database. Spread across services in the original; centralized here so the
/// soft-delete convention has one spelling per collection.
pub mod collections {
    pub const EXAMS: &str = "exams";
    pub const INTAKES: &str = "intakes";
    pub const ADMINS: &str = "admins";
    pub const TUTORS: &str = "tutors";
    pub const STUDENTS: &str = "students";
}

pub const IS_DELETED: &str = "isDeleted";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// A document as returned by the store: its id plus the stored JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Value,
}

impl StoredDocument {
    /// Decode the JSON payload into a typed record.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.data.clone())
            .map_err(|err| StoreError::Decode { id: self.id.clone(), source: err })
    }
}

/// Equality filter on a top-level document field. The only filter shape this
/// application queries with.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { field: field.into(), value: value.into() }
    }

    pub fn not_deleted() -> Self {
        Self::eq(IS_DELETED, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: Direction::Ascending }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: Direction::Descending }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store request failed: {0}")]
    Transport(String),
    #[error("document store rejected the request (status {status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("document {id} not found in {collection}")]
    NotFound { collection: String, id: String },
    #[error("failed to decode document {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("document store returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// The persistence collaborator. Everything durable lives behind this seam;
/// the application itself keeps no storage of its own.
///
/// Soft deletion is a convention on top of `update` (`{"isDeleted": true}`),
/// not a separate primitive. `add` and `update` stamp `createdAt` /
/// `updatedAt` server-side; callers never set those fields.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError>;
}

/// Mark a document deleted without purging it.
pub async fn soft_delete(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<(), StoreError> {
    store.update(collection, id, serde_json::json!({ IS_DELETED: true })).await
}
