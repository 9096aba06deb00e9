use crate::exam::question::QuestionKind;

use super::{EditError, QuestionEdit};

/// Marker the question text uses for a blank, e.g. "Water boils at __ °C".
pub const BLANK_MARKER: &str = "__";

/// How many blanks the question text declares. Purely informational for the
/// UI; validation does not require any.
pub fn blank_count(question: &str) -> usize {
    question.matches(BLANK_MARKER).count()
}

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
        QuestionEdit::SetAnswer(text) => {
            *answer = text;
            Ok(())
        }
        other => Err(EditError::Unsupported { kind: QuestionKind::FillBlanks, edit: other.name() }),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{apply, QuestionEdit};
    use super::blank_count;
    use crate::exam::question::{QuestionDraft, QuestionKind};

    #[test]
    fn counts_blank_markers() {
        assert_eq!(blank_count("Water boils at __ °C and freezes at __ °C"), 2);
        assert_eq!(blank_count("No blanks here"), 0);
    }

    #[test]
    fn edits_question_and_answer() {
        let mut draft = QuestionDraft::default_for(QuestionKind::FillBlanks);
        apply(&mut draft, QuestionEdit::SetQuestionText("__ is the capital of France".into()))
            .unwrap();
        apply(&mut draft, QuestionEdit::SetAnswer("Paris".into())).unwrap();

        let QuestionDraft::FillBlanks { question, answer, .. } = &draft else {
            panic!("wrong variant");
        };
        assert_eq!(question, "__ is the capital of France");
        assert_eq!(answer, "Paris");
    }
}
