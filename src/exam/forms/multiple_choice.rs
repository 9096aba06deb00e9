use crate::exam::question::{ChoiceOption, QuestionKind};

use super::{EditError, QuestionEdit, MIN_OPTIONS};

pub(super) fn apply(
    question: &mut String,
    options: &mut Vec<ChoiceOption>,
    answer: &mut String,
    edit: QuestionEdit,
) -> Result<(), EditError> {
    match edit {
        QuestionEdit::SetQuestionText(text) => {
            *question = text;
            Ok(())
        }
        // The answer control is a single-select over the current option
        // texts; free text never reaches it.
        QuestionEdit::SetAnswer(text) => {
            if options.iter().any(|option| option.text == text) {
                *answer = text;
                Ok(())
            } else {
                Err(EditError::AnswerNotAnOption)
            }
        }
        QuestionEdit::AddOption => {
            options.push(ChoiceOption::empty());
            Ok(())
        }
        QuestionEdit::EditOption { option_id, text } => {
            let option = options
                .iter_mut()
                .find(|option| option.id == option_id)
                .ok_or_else(|| EditError::UnknownOption(option_id.clone()))?;

            // Keep the answer pointing at the same option through renames.
            if !answer.is_empty() && option.text == *answer {
                *answer = text.clone();
            }
            option.text = text;
            Ok(())
        }
        QuestionEdit::RemoveOption { option_id } => {
            let position = options
                .iter()
                .position(|option| option.id == option_id)
                .ok_or_else(|| EditError::UnknownOption(option_id.clone()))?;

            if options.len() <= MIN_OPTIONS {
                return Err(EditError::MinimumOptions);
            }

            let removed = options.remove(position);
            if removed.text == *answer {
                answer.clear();
            }
            Ok(())
        }
        other => {
            Err(EditError::Unsupported { kind: QuestionKind::MultipleChoice, edit: other.name() })
        }
    }
}
