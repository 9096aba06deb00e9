use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;

use crate::core::state::AppState;
use crate::exam::forms::EditError;
use crate::exam::list::{EditorMode, QuestionList};
use crate::exam::question::QuestionDraft;
use crate::exam::validate::{validate_draft, ValidationError};
use crate::exam::ExamRecord;
use crate::media::{MediaFile, MediaState, UploadError};
use crate::store::{collections::EXAMS, StoreError};

/// Why a submit attempt did not persist anything. Every variant leaves the
/// in-memory draft exactly as it was, so the user can edit and retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("a save is already in progress")]
    AlreadySubmitting,
    #[error("the exam is open in read-only mode")]
    ReadOnly,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode the exam document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One editing session over one exam draft.
///
/// Hydrated either empty (create) or from a persisted record (view/edit);
/// mutated in memory through its setters and [`QuestionList`]; persisted
/// atomically on [`ExamEditor::submit`]. The session owns the draft
/// exclusively; the document store provides no concurrency check, so two
/// sessions saving the same exam resolve as last-writer-wins.
#[derive(Debug, Clone)]
pub struct ExamEditor {
    id: Option<String>,
    title: String,
    duration_minutes: u32,
    intake_id: Option<String>,
    questions: QuestionList,
    submitting: bool,
}

impl ExamEditor {
    /// Start authoring a new exam: empty title, no duration yet, one default
    /// multiple-choice question.
    pub fn new() -> Self {
        Self {
            id: None,
            title: String::new(),
            duration_minutes: 0,
            intake_id: None,
            questions: QuestionList::new(),
            submitting: false,
        }
    }

    /// Open an existing exam, read-only for viewing or editable for updating.
    pub fn from_record(id: String, record: ExamRecord, readonly: bool) -> Self {
        let mode = if readonly { EditorMode::ReadOnly } else { EditorMode::Editing };
        Self {
            id: Some(id),
            title: record.title,
            duration_minutes: record.duration,
            intake_id: record.intake_id,
            questions: QuestionList::from_questions(record.questions, mode),
            submitting: false,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn intake_id(&self) -> Option<&str> {
        self.intake_id.as_deref()
    }

    pub fn questions(&self) -> &QuestionList {
        &self.questions
    }

    pub fn questions_mut(&mut self) -> &mut QuestionList {
        &mut self.questions
    }

    pub fn mode(&self) -> EditorMode {
        self.questions.mode()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Freeze the draft. One-way: there is no way back to editing.
    pub fn set_readonly(&mut self) {
        self.questions.set_readonly();
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.title = title.into();
        Ok(())
    }

    pub fn set_duration_minutes(&mut self, minutes: u32) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.duration_minutes = minutes;
        Ok(())
    }

    pub fn set_intake(&mut self, intake_id: Option<String>) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.intake_id = intake_id;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), EditError> {
        match self.mode() {
            EditorMode::Editing => Ok(()),
            EditorMode::ReadOnly => Err(EditError::ReadOnly),
        }
    }

    /// Run the full-draft checks, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_draft(&self.title, self.duration_minutes, self.questions.questions())
    }

    /// Validate, resolve every pending media upload, then write the whole
    /// document to the store: create when the draft has no id, update
    /// otherwise. Returns the persisted exam id.
    ///
    /// Uploads of one submit run concurrently; the store write only starts
    /// after all of them succeed. On any failure nothing is persisted and the
    /// draft keeps its pending files, so resubmitting retries them all.
    pub async fn submit(&mut self, state: &AppState) -> Result<String, SubmitError> {
        if self.mode() == EditorMode::ReadOnly {
            return Err(SubmitError::ReadOnly);
        }
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        self.validate()?;

        self.submitting = true;
        let outcome = self.resolve_and_save(state).await;
        self.submitting = false;

        let (id, resolved) = outcome?;
        self.questions.replace_all(resolved);
        self.id = Some(id.clone());
        Ok(id)
    }

    async fn resolve_and_save(
        &self,
        state: &AppState,
    ) -> Result<(String, Vec<QuestionDraft>), SubmitError> {
        let mut resolved = self.questions.questions().to_vec();
        let pending: Vec<(usize, MediaFile)> = resolved
            .iter()
            .enumerate()
            .filter_map(|(index, question)| match question.media() {
                MediaState::PendingLocal(file) => Some((index, file.clone())),
                _ => None,
            })
            .collect();

        if !pending.is_empty() {
            tracing::debug!(uploads = pending.len(), "Resolving pending media before save");
        }

        let mut uploads = JoinSet::new();
        for (index, file) in pending {
            let uploader = Arc::clone(state.uploader());
            uploads.spawn(async move { (index, uploader.upload(&file).await) });
        }

        let mut results = Vec::new();
        while let Some(joined) = uploads.join_next().await {
            let (index, result) = joined
                .map_err(|err| UploadError::Transport(format!("upload task failed: {err}")))?;
            results.push((index, result));
        }

        // All uploads have settled; report the earliest failure, if any.
        results.sort_by_key(|(index, _)| *index);
        for (index, result) in results {
            match result {
                Ok(url) => *resolved[index].media_mut() = MediaState::Remote(url),
                Err(err) => {
                    tracing::warn!(question = index + 1, error = %err, "Media upload failed; save aborted");
                    return Err(err.into());
                }
            }
        }

        let record = ExamRecord {
            title: self.title.clone(),
            duration: self.duration_minutes,
            questions: resolved.clone(),
            intake_id: self.intake_id.clone(),
            is_deleted: false,
            created_at: None,
            updated_at: None,
        };
        let document = serde_json::to_value(&record)?;

        let id = match &self.id {
            Some(id) => {
                state.store().update(EXAMS, id, document).await?;
                id.clone()
            }
            None => state.store().add(EXAMS, document).await?,
        };

        tracing::info!(exam_id = %id, questions = resolved.len(), "Exam saved");
        Ok((id, resolved))
    }
}

impl Default for ExamEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::question::{ChoiceOption, QuestionKind};
    use crate::exam::validate::QuestionProblem;
    use crate::store::{DocumentStore, Filter};
    use crate::test_support::{
        env_lock, failing_upload_state, memory_state, valid_multiple_choice, with_pending_media,
    };

    fn valid_editor() -> ExamEditor {
        let mut editor = ExamEditor::new();
        editor.set_title("Midterm").unwrap();
        editor.set_duration_minutes(60).unwrap();
        editor.questions_mut().replace_question(0, valid_multiple_choice()).unwrap();
        editor
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_store() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let mut editor = valid_editor();
        editor.set_title("").unwrap();

        let err = editor.submit(&state).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ValidationError::EmptyTitle)));
        assert!(store.is_empty(EXAMS));
        assert!(!editor.is_submitting());
    }

    #[tokio::test]
    async fn submit_persists_questions_in_order() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let mut editor = valid_editor();
        editor.questions_mut().add_question(QuestionKind::TrueFalse).unwrap();
        editor
            .questions_mut()
            .edit_question(1, crate::exam::forms::QuestionEdit::SetQuestionText("Sky is blue".into()))
            .unwrap();
        editor
            .questions_mut()
            .edit_question(1, crate::exam::forms::QuestionEdit::SetAnswer("True".into()))
            .unwrap();
        editor.questions_mut().reorder(1, 0).unwrap();

        let id = editor.submit(&state).await.unwrap();
        assert_eq!(editor.id(), Some(id.as_str()));

        let stored = store.get(EXAMS, &id).await.unwrap().unwrap();
        let record: ExamRecord = stored.decode().unwrap();
        assert_eq!(record.questions.len(), 2);
        assert_eq!(record.questions[0].kind(), QuestionKind::TrueFalse);
        assert_eq!(record.questions[1].kind(), QuestionKind::MultipleChoice);
        assert!(!record.is_deleted);
    }

    #[tokio::test]
    async fn round_trips_through_the_store() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let mut editor = valid_editor();
        let submitted = editor.questions().questions().to_vec();
        let id = editor.submit(&state).await.unwrap();

        let stored = store.get(EXAMS, &id).await.unwrap().unwrap();
        let record: ExamRecord = stored.decode().unwrap();
        assert_eq!(record.questions, submitted);
        assert_eq!(record.title, "Midterm");
        assert_eq!(record.duration, 60);
    }

    #[tokio::test]
    async fn update_writes_back_to_the_same_document() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let mut editor = valid_editor();
        let id = editor.submit(&state).await.unwrap();

        editor.set_title("Midterm v2").unwrap();
        let second = editor.submit(&state).await.unwrap();
        assert_eq!(second, id);
        assert_eq!(store.len(EXAMS), 1);

        let record: ExamRecord = store.get(EXAMS, &id).await.unwrap().unwrap().decode().unwrap();
        assert_eq!(record.title, "Midterm v2");
    }

    #[tokio::test]
    async fn pending_media_is_resolved_before_the_write() {
        let _guard = env_lock();
        let (state, store) = memory_state();

        let mut editor = valid_editor();
        editor.questions_mut().replace_question(0, with_pending_media(valid_multiple_choice())).unwrap();

        let id = editor.submit(&state).await.unwrap();
        let record: ExamRecord = store.get(EXAMS, &id).await.unwrap().unwrap().decode().unwrap();
        assert!(matches!(record.questions[0].media(), MediaState::Remote(url) if url.starts_with("https://")));
        // The in-memory draft now carries the issued URL as well.
        assert!(matches!(editor.questions().questions()[0].media(), MediaState::Remote(_)));
    }

    #[tokio::test]
    async fn failed_upload_aborts_and_leaves_the_draft_untouched() {
        let _guard = env_lock();
        let (state, store) = failing_upload_state();

        let mut editor = valid_editor();
        let pending = with_pending_media(valid_multiple_choice());
        editor.questions_mut().replace_question(0, pending.clone()).unwrap();

        let err = editor.submit(&state).await.unwrap_err();
        assert!(matches!(err, SubmitError::Upload(_)));
        assert!(store.is_empty(EXAMS));
        // The original local file is still attached, ready for a retry.
        assert_eq!(editor.questions().questions()[0], pending);
        assert!(!editor.is_submitting());
    }

    #[tokio::test]
    async fn readonly_editor_refuses_to_submit() {
        let _guard = env_lock();
        let (state, _store) = memory_state();

        let mut editor = valid_editor();
        editor.set_readonly();

        assert!(matches!(editor.submit(&state).await, Err(SubmitError::ReadOnly)));
        assert!(editor.set_title("nope").is_err());
    }

    #[tokio::test]
    async fn validation_precedes_upload_work() {
        let _guard = env_lock();
        // Uploads would fail, but validation stops the submit first.
        let (state, store) = failing_upload_state();

        let mut editor = ExamEditor::new();
        editor.set_title("Quiz").unwrap();
        editor.set_duration_minutes(10).unwrap();
        let question = QuestionDraft::MultipleChoice {
            question: "Pick".into(),
            options: vec![ChoiceOption::new("A"), ChoiceOption::new("")],
            answer: "A".into(),
            media: crate::media::MediaState::Absent,
        };
        editor.questions_mut().replace_question(0, with_pending_media(question)).unwrap();

        let err = editor.submit(&state).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Invalid(ValidationError::Question {
                index: 0,
                problem: QuestionProblem::EmptyOption { position: 1 }
            })
        ));
        assert!(store.is_empty(EXAMS));
    }

    #[tokio::test]
    async fn store_failure_surfaces_and_keeps_the_draft() {
        let _guard = env_lock();
        let (state, _store) = crate::test_support::failing_store_state();

        let mut editor = valid_editor();
        let before = editor.questions().questions().to_vec();

        let err = editor.submit(&state).await.unwrap_err();
        assert!(matches!(err, SubmitError::Store(_)));
        assert_eq!(editor.questions().questions(), &before[..]);
        assert_eq!(editor.id(), None);
        assert!(!editor.is_submitting());
    }

    #[test]
    fn filter_not_deleted_matches_saved_records() {
        // The browse view's filter must line up with what submit writes.
        let filter = Filter::not_deleted();
        assert_eq!(filter.field, "isDeleted");
        assert_eq!(filter.value, serde_json::Value::Bool(false));
    }
}
