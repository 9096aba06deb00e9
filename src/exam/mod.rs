use serde::{Deserialize, Serialize};

pub mod browse;
pub mod editor;
pub mod forms;
pub mod list;
pub mod question;
pub mod validate;

pub use editor::{ExamEditor, SubmitError};
pub use list::{EditorMode, MoveDirection, QuestionList};
pub use question::{ChoiceOption, MatchPair, QuestionDraft, QuestionKind};
pub use validate::{QuestionProblem, ValidationError};

/// The persisted exam document. Question order is significant and round-trips
/// exactly. `createdAt`/`updatedAt` are stamped by the store and never sent
/// by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    pub title: String,
    pub duration: u32,
    pub questions: Vec<QuestionDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake_id: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
