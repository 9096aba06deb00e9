use thiserror::Error;

use crate::exam::question::{QuestionDraft, QuestionKind};
use crate::media::{MediaFile, MediaState};

mod fill_blanks;
mod match_pairs;
mod multiple_choice;
mod reasoning;
mod short_answer;
mod true_false;

pub use fill_blanks::blank_count;

/// Multiple-choice questions never drop below this many options.
pub const MIN_OPTIONS: usize = 2;
/// Matching questions never drop below this many pairs.
pub const MIN_PAIRS: usize = 1;

/// A single field edit coming from the hosting UI. Sub-items are addressed by
/// their stable ids, never by position.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionEdit {
    SetQuestionText(String),
    SetAnswer(String),
    AddOption,
    EditOption { option_id: String, text: String },
    RemoveOption { option_id: String },
    AddPair,
    EditPairLeft { pair_id: String, text: String },
    EditPairRight { pair_id: String, text: String },
    RemovePair { pair_id: String },
    AttachMedia(MediaFile),
    ClearMedia,
}

impl QuestionEdit {
    fn name(&self) -> &'static str {
        match self {
            Self::SetQuestionText(_) => "SetQuestionText",
            Self::SetAnswer(_) => "SetAnswer",
            Self::AddOption => "AddOption",
            Self::EditOption { .. } => "EditOption",
            Self::RemoveOption { .. } => "RemoveOption",
            Self::AddPair => "AddPair",
            Self::EditPairLeft { .. } => "EditPairLeft",
            Self::EditPairRight { .. } => "EditPairRight",
            Self::RemovePair { .. } => "RemovePair",
            Self::AttachMedia(_) => "AttachMedia",
            Self::ClearMedia => "ClearMedia",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("the editor is read-only")]
    ReadOnly,
    #[error("no question at index {0}")]
    OutOfRange(usize),
    #[error("{edit} does not apply to a {kind} question")]
    Unsupported { kind: QuestionKind, edit: &'static str },
    #[error("multiple-choice questions keep at least {MIN_OPTIONS} options")]
    MinimumOptions,
    #[error("match questions keep at least {MIN_PAIRS} pair")]
    MinimumPairs,
    #[error("no option with id {0}")]
    UnknownOption(String),
    #[error("no pair with id {0}")]
    UnknownPair(String),
    #[error("the answer must match one of the current options")]
    AnswerNotAnOption,
    #[error("true/false answers must be \"True\" or \"False\"")]
    InvalidTrueFalseAnswer,
}

/// Apply one edit to a question draft, dispatching on the draft's type.
///
/// Media edits are shared by every type; everything else is handled by the
/// per-type editor, which rejects edits that do not belong to it.
pub fn apply(draft: &mut QuestionDraft, edit: QuestionEdit) -> Result<(), EditError> {
    let edit = match edit {
        QuestionEdit::AttachMedia(file) => {
            *draft.media_mut() = MediaState::PendingLocal(file);
            return Ok(());
        }
        QuestionEdit::ClearMedia => {
            *draft.media_mut() = MediaState::Absent;
            return Ok(());
        }
        other => other,
    };

    match draft {
        QuestionDraft::MultipleChoice { question, options, answer, .. } => {
            multiple_choice::apply(question, options, answer, edit)
        }
        QuestionDraft::TrueFalse { question, answer, .. } => {
            true_false::apply(question, answer, edit)
        }
        QuestionDraft::FillBlanks { question, answer, .. } => {
            fill_blanks::apply(question, answer, edit)
        }
        QuestionDraft::ShortAnswer { question, answer, .. } => {
            short_answer::apply(question, answer, edit)
        }
        QuestionDraft::Reasoning { question, answer, .. } => {
            reasoning::apply(question, answer, edit)
        }
        QuestionDraft::Match { match_pairs: pairs, .. } => match_pairs::apply(pairs, edit),
    }
}
