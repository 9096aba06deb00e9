use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::core::state::AppState;
use crate::schemas::accounts::{AccountUpdate, AdminCreate, StudentCreate, TutorCreate};
use crate::store::{
    collections::{ADMINS, STUDENTS, TUTORS},
    soft_delete, Filter, OrderBy, StoreError, CREATED_AT,
};

/// The three managed account collections: master admins run `admins`,
/// tutor-admins run `tutors`, tutors run `students`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountCollection {
    Admins,
    Tutors,
    Students,
}

impl AccountCollection {
    pub fn name(self) -> &'static str {
        match self {
            Self::Admins => ADMINS,
            Self::Tutors => TUTORS,
            Self::Students => STUDENTS,
        }
    }
}

/// An account document as persisted. The admin-tier flags only exist on
/// `admins` documents, the intake reference only on `students`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_master_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tutor_admin: Option<bool>,
    pub is_approved: bool,
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub record: AccountRecord,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid account payload: {0}")]
    Invalid(String),
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Non-deleted accounts of one collection, newest first.
pub async fn list(
    state: &AppState,
    collection: AccountCollection,
) -> Result<Vec<Account>, AccountError> {
    let documents = state
        .store()
        .query(collection.name(), &[Filter::not_deleted()], Some(&OrderBy::desc(CREATED_AT)))
        .await?;

    let mut accounts = Vec::with_capacity(documents.len());
    for document in documents {
        let record: AccountRecord = document.decode()?;
        accounts.push(Account { id: document.id, record });
    }
    Ok(accounts)
}

async fn ensure_unique_email(
    state: &AppState,
    collection: AccountCollection,
    email: &str,
) -> Result<(), AccountError> {
    let existing = state
        .store()
        .query(collection.name(), &[Filter::eq("email", email)], None)
        .await?;

    if existing.is_empty() {
        Ok(())
    } else {
        Err(AccountError::DuplicateEmail)
    }
}

async fn create(
    state: &AppState,
    collection: AccountCollection,
    record: AccountRecord,
) -> Result<String, AccountError> {
    ensure_unique_email(state, collection, &record.email).await?;

    let document = serde_json::to_value(&record)
        .map_err(|err| AccountError::Invalid(err.to_string()))?;
    let id = state.store().add(collection.name(), document).await?;
    tracing::info!(collection = collection.name(), account_id = %id, "Account created");
    Ok(id)
}

/// New accounts start unapproved; an admin flips the flag later.
pub async fn create_admin(state: &AppState, payload: AdminCreate) -> Result<String, AccountError> {
    payload.validate().map_err(|err| AccountError::Invalid(err.to_string()))?;
    create(
        state,
        AccountCollection::Admins,
        AccountRecord {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            intake_id: None,
            is_master_admin: Some(payload.is_master_admin),
            is_tutor_admin: Some(payload.is_tutor_admin),
            is_approved: false,
            is_deleted: false,
            created_at: None,
            updated_at: None,
        },
    )
    .await
}

pub async fn create_tutor(state: &AppState, payload: TutorCreate) -> Result<String, AccountError> {
    payload.validate().map_err(|err| AccountError::Invalid(err.to_string()))?;
    create(
        state,
        AccountCollection::Tutors,
        AccountRecord {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            intake_id: None,
            is_master_admin: None,
            is_tutor_admin: None,
            is_approved: false,
            is_deleted: false,
            created_at: None,
            updated_at: None,
        },
    )
    .await
}

pub async fn create_student(
    state: &AppState,
    payload: StudentCreate,
) -> Result<String, AccountError> {
    payload.validate().map_err(|err| AccountError::Invalid(err.to_string()))?;
    create(
        state,
        AccountCollection::Students,
        AccountRecord {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            intake_id: Some(payload.intake_id),
            is_master_admin: None,
            is_tutor_admin: None,
            is_approved: false,
            is_deleted: false,
            created_at: None,
            updated_at: None,
        },
    )
    .await
}

/// Patch the provided fields only; everything omitted stays as stored.
pub async fn update(
    state: &AppState,
    collection: AccountCollection,
    id: &str,
    payload: AccountUpdate,
) -> Result<(), AccountError> {
    payload.validate().map_err(|err| AccountError::Invalid(err.to_string()))?;

    let mut patch = serde_json::Map::new();
    if let Some(name) = payload.name {
        patch.insert("name".to_string(), Value::String(name));
    }
    if let Some(email) = payload.email {
        patch.insert("email".to_string(), Value::String(email));
    }
    if let Some(password) = payload.password {
        patch.insert("password".to_string(), Value::String(password));
    }
    if let Some(intake_id) = payload.intake_id {
        patch.insert("intakeId".to_string(), Value::String(intake_id));
    }

    if patch.is_empty() {
        return Ok(());
    }

    state.store().update(collection.name(), id, Value::Object(patch)).await?;
    Ok(())
}

pub async fn set_approval(
    state: &AppState,
    collection: AccountCollection,
    id: &str,
    approved: bool,
) -> Result<(), AccountError> {
    state
        .store()
        .update(collection.name(), id, serde_json::json!({ "isApproved": approved }))
        .await?;
    tracing::info!(collection = collection.name(), account_id = %id, approved, "Approval updated");
    Ok(())
}

/// Hide the account from every list; the document stays in the store.
pub async fn delete(
    state: &AppState,
    collection: AccountCollection,
    id: &str,
) -> Result<(), AccountError> {
    soft_delete(state.store(), collection.name(), id).await?;
    tracing::info!(collection = collection.name(), account_id = %id, "Account soft-deleted");
    Ok(())
}
