use crate::exam::question::QuestionKind;

use super::{EditError, QuestionEdit};

pub(super) fn apply(
    question: &mut String,
    answer: &mut String,
    edit: QuestionEdit,
) -> Result<(), EditError> {
    match edit {
        QuestionEdit::SetQuestionText(text) => {
            *question = text;
            Ok(())
        }
        // Free-text rationale rather than a single expected value.
        QuestionEdit::SetAnswer(text) => {
            *answer = text;
            Ok(())
        }
        other => Err(EditError::Unsupported { kind: QuestionKind::Reasoning, edit: other.name() }),
    }
}
