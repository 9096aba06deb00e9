use std::collections::HashMap;

use serde::Deserialize;

use crate::core::state::AppState;
use crate::exam::editor::ExamEditor;
use crate::exam::ExamRecord;
use crate::store::{
    collections::{EXAMS, INTAKES},
    soft_delete, Filter, OrderBy, StoreError, CREATED_AT,
};

/// One row of the exam browse view: the persisted record joined with its
/// intake's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamSummary {
    pub id: String,
    pub intake_name: Option<String>,
    pub record: ExamRecord,
}

impl ExamSummary {
    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn question_count(&self) -> usize {
        self.record.questions.len()
    }
}

#[derive(Debug, Deserialize)]
struct IntakeName {
    name: String,
}

async fn intake_names(state: &AppState) -> Result<HashMap<String, String>, StoreError> {
    let documents = state.store().query(INTAKES, &[], Some(&OrderBy::asc("name"))).await?;

    let mut names = HashMap::with_capacity(documents.len());
    for document in documents {
        let intake: IntakeName = document.decode()?;
        names.insert(document.id, intake.name);
    }
    Ok(names)
}

/// Load every non-deleted exam, newest first, with intake names resolved.
pub async fn list(state: &AppState) -> Result<Vec<ExamSummary>, StoreError> {
    let intakes = intake_names(state).await?;
    let documents = state
        .store()
        .query(EXAMS, &[Filter::not_deleted()], Some(&OrderBy::desc(CREATED_AT)))
        .await?;

    let mut summaries = Vec::with_capacity(documents.len());
    for document in documents {
        let record: ExamRecord = document.decode()?;
        let intake_name =
            record.intake_id.as_ref().and_then(|intake_id| intakes.get(intake_id).cloned());
        summaries.push(ExamSummary { id: document.id, intake_name, record });
    }

    tracing::debug!(count = summaries.len(), "Loaded exam summaries");
    Ok(summaries)
}

/// Case-insensitive title filter over already-loaded summaries.
pub fn search(summaries: &[ExamSummary], term: &str) -> Vec<ExamSummary> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return summaries.to_vec();
    }

    summaries
        .iter()
        .filter(|summary| summary.title().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Hide an exam from every list view without purging it.
pub async fn delete(state: &AppState, id: &str) -> Result<(), StoreError> {
    soft_delete(state.store(), EXAMS, id).await?;
    tracing::info!(exam_id = %id, "Exam soft-deleted");
    Ok(())
}

/// Start a brand-new authoring session.
pub fn create() -> ExamEditor {
    ExamEditor::new()
}

/// Open a loaded exam for viewing (`readonly`) or editing.
pub fn open(summary: &ExamSummary, readonly: bool) -> ExamEditor {
    ExamEditor::from_record(summary.id.clone(), summary.record.clone(), readonly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::list::EditorMode;
    use crate::store::DocumentStore;
    use crate::test_support::{env_lock, memory_state, valid_multiple_choice};

    async fn seed_exam(state: &AppState, title: &str, intake_id: Option<String>) -> String {
        let mut editor = ExamEditor::new();
        editor.set_title(title).unwrap();
        editor.set_duration_minutes(45).unwrap();
        editor.set_intake(intake_id).unwrap();
        editor.questions_mut().replace_question(0, valid_multiple_choice()).unwrap();
        editor.submit(state).await.unwrap()
    }

    #[tokio::test]
    async fn lists_newest_first_and_skips_deleted() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let first = seed_exam(&state, "Algebra", None).await;
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let second = seed_exam(&state, "Biology", None).await;

        let summaries = list(&state).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, second);
        assert_eq!(summaries[1].id, first);

        delete(&state, &second).await.unwrap();
        let summaries = list(&state).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title(), "Algebra");
        // Still in the store, just hidden.
        assert_eq!(store.len(EXAMS), 2);
    }

    #[tokio::test]
    async fn resolves_intake_names() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let intake_id = store
            .add(INTAKES, serde_json::json!({ "name": "January 2026" }))
            .await
            .unwrap();
        seed_exam(&state, "Chemistry", Some(intake_id)).await;
        seed_exam(&state, "Physics", None).await;

        let summaries = list(&state).await.unwrap();
        let chemistry =
            summaries.iter().find(|summary| summary.title() == "Chemistry").unwrap();
        assert_eq!(chemistry.intake_name.as_deref(), Some("January 2026"));

        let physics = summaries.iter().find(|summary| summary.title() == "Physics").unwrap();
        assert_eq!(physics.intake_name, None);
    }

    #[tokio::test]
    async fn search_filters_by_title() {
        let _guard = env_lock();
        let (state, _store) = memory_state();

        seed_exam(&state, "Algebra Midterm", None).await;
        seed_exam(&state, "Biology Finals", None).await;

        let summaries = list(&state).await.unwrap();
        let hits = search(&summaries, "algebra");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title(), "Algebra Midterm");

        assert_eq!(search(&summaries, "  ").len(), 2);
        assert!(search(&summaries, "history").is_empty());
    }

    #[tokio::test]
    async fn open_hydrates_the_editor_in_the_requested_mode() {
        let _guard = env_lock();
        let (state, _store) = memory_state();

        seed_exam(&state, "Geometry", None).await;
        let summaries = list(&state).await.unwrap();

        let viewer = open(&summaries[0], true);
        assert_eq!(viewer.mode(), EditorMode::ReadOnly);
        assert_eq!(viewer.title(), "Geometry");

        let editor = open(&summaries[0], false);
        assert_eq!(editor.mode(), EditorMode::Editing);
        assert_eq!(editor.id(), Some(summaries[0].id.as_str()));
        assert_eq!(editor.questions().len(), 1);
    }
}
