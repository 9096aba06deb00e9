use crate::exam::question::{QuestionKind, FALSE_ANSWER, TRUE_ANSWER};

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
        QuestionEdit::SetAnswer(text) => {
            if text == TRUE_ANSWER || text == FALSE_ANSWER {
                *answer = text;
                Ok(())
            } else {
                Err(EditError::InvalidTrueFalseAnswer)
            }
        }
        other => Err(EditError::Unsupported { kind: QuestionKind::TrueFalse, edit: other.name() }),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{apply, EditError, QuestionEdit};
    use crate::exam::question::{QuestionDraft, QuestionKind};

    #[test]
    fn accepts_only_the_two_literals() {
        let mut draft = QuestionDraft::default_for(QuestionKind::TrueFalse);

        apply(&mut draft, QuestionEdit::SetAnswer("True".into())).unwrap();
        apply(&mut draft, QuestionEdit::SetAnswer("False".into())).unwrap();

        let err = apply(&mut draft, QuestionEdit::SetAnswer("Maybe".into())).unwrap_err();
        assert_eq!(err, EditError::InvalidTrueFalseAnswer);

        let QuestionDraft::TrueFalse { answer, .. } = &draft else { panic!("wrong variant") };
        assert_eq!(answer, "False");
    }
}
