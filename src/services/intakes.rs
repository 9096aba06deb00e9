use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::core::state::AppState;
use crate::schemas::accounts::IntakeCreate;
use crate::store::{collections::INTAKES, soft_delete, Filter, OrderBy, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub name: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Intake {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("invalid intake payload: {0}")]
    Invalid(String),
    #[error("an intake with this name already exists")]
    DuplicateName,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Non-deleted intakes, alphabetical.
pub async fn list(state: &AppState) -> Result<Vec<Intake>, IntakeError> {
    let documents = state
        .store()
        .query(INTAKES, &[Filter::not_deleted()], Some(&OrderBy::asc("name")))
        .await?;

    let mut intakes = Vec::with_capacity(documents.len());
    for document in documents {
        let record: IntakeRecord = document.decode()?;
        intakes.push(Intake { id: document.id, name: record.name });
    }
    Ok(intakes)
}

async fn ensure_unique_name(
    state: &AppState,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<(), IntakeError> {
    let intakes = list(state).await?;
    let taken = intakes.iter().any(|intake| {
        intake.name.eq_ignore_ascii_case(name) && Some(intake.id.as_str()) != exclude_id
    });

    if taken {
        Err(IntakeError::DuplicateName)
    } else {
        Ok(())
    }
}

pub async fn create(state: &AppState, payload: IntakeCreate) -> Result<String, IntakeError> {
    payload.validate().map_err(|err| IntakeError::Invalid(err.to_string()))?;
    let name = payload.name.trim().to_string();
    ensure_unique_name(state, &name, None).await?;

    let record = IntakeRecord { name, is_deleted: false, created_at: None };
    let document =
        serde_json::to_value(&record).map_err(|err| IntakeError::Invalid(err.to_string()))?;
    let id = state.store().add(INTAKES, document).await?;
    tracing::info!(intake_id = %id, "Intake created");
    Ok(id)
}

pub async fn rename(state: &AppState, id: &str, payload: IntakeCreate) -> Result<(), IntakeError> {
    payload.validate().map_err(|err| IntakeError::Invalid(err.to_string()))?;
    let name = payload.name.trim().to_string();
    ensure_unique_name(state, &name, Some(id)).await?;

    state.store().update(INTAKES, id, serde_json::json!({ "name": name })).await?;
    Ok(())
}

pub async fn delete(state: &AppState, id: &str) -> Result<(), IntakeError> {
    soft_delete(state.store(), INTAKES, id).await?;
    tracing::info!(intake_id = %id, "Intake soft-deleted");
    Ok(())
}
