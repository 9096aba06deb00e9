use thiserror::Error;

use crate::exam::forms::{MIN_OPTIONS, MIN_PAIRS};
use crate::exam::question::{QuestionDraft, FALSE_ANSWER, TRUE_ANSWER};

/// First unmet requirement of a draft, in the fixed check order: exam title,
/// duration, question count, then each question in list order. Carries enough
/// position information for the UI to focus the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid exam title.")]
    EmptyTitle,
    #[error("Please enter a positive duration in minutes.")]
    InvalidDuration,
    #[error("Add at least one question to save the exam.")]
    NoQuestions,
    #[error("Question {}: {problem}", .index + 1)]
    Question { index: usize, problem: QuestionProblem },
}

impl ValidationError {
    /// Index of the offending question, when the failure is inside one.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            Self::Question { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionProblem {
    #[error("question text cannot be empty.")]
    EmptyQuestionText,
    #[error("multiple-choice questions must have at least {MIN_OPTIONS} options.")]
    TooFewOptions,
    #[error("option {} cannot be empty.", .position + 1)]
    EmptyOption { position: usize },
    #[error("the correct answer cannot be empty.")]
    EmptyAnswer,
    #[error("the correct answer must match one of the options.")]
    AnswerNotAnOption,
    #[error("the correct answer must be \"{TRUE_ANSWER}\" or \"{FALSE_ANSWER}\".")]
    AnswerNotTrueFalse,
    #[error("add at least one matching pair.")]
    NoPairs,
    #[error("match pair {} cannot have empty fields.", .position + 1)]
    IncompletePair { position: usize },
}

fn blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Validate a whole draft, returning the first violation found.
pub(crate) fn validate_draft(
    title: &str,
    duration_minutes: u32,
    questions: &[QuestionDraft],
) -> Result<(), ValidationError> {
    if blank(title) {
        return Err(ValidationError::EmptyTitle);
    }
    if duration_minutes == 0 {
        return Err(ValidationError::InvalidDuration);
    }
    if questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }

    for (index, question) in questions.iter().enumerate() {
        if let Err(problem) = validate_question(question) {
            return Err(ValidationError::Question { index, problem });
        }
    }

    Ok(())
}

fn validate_question(question: &QuestionDraft) -> Result<(), QuestionProblem> {
    match question {
        QuestionDraft::MultipleChoice { question, options, answer, .. } => {
            if blank(question) {
                return Err(QuestionProblem::EmptyQuestionText);
            }
            if options.len() < MIN_OPTIONS {
                return Err(QuestionProblem::TooFewOptions);
            }
            for (position, option) in options.iter().enumerate() {
                if blank(&option.text) {
                    return Err(QuestionProblem::EmptyOption { position });
                }
            }
            if blank(answer) {
                return Err(QuestionProblem::EmptyAnswer);
            }
            if !options.iter().any(|option| option.text == *answer) {
                return Err(QuestionProblem::AnswerNotAnOption);
            }
            Ok(())
        }
        QuestionDraft::TrueFalse { question, answer, .. } => {
            if blank(question) {
                return Err(QuestionProblem::EmptyQuestionText);
            }
            if blank(answer) {
                return Err(QuestionProblem::EmptyAnswer);
            }
            if answer != TRUE_ANSWER && answer != FALSE_ANSWER {
                return Err(QuestionProblem::AnswerNotTrueFalse);
            }
            Ok(())
        }
        QuestionDraft::FillBlanks { question, answer, .. }
        | QuestionDraft::ShortAnswer { question, answer, .. }
        | QuestionDraft::Reasoning { question, answer, .. } => {
            if blank(question) {
                return Err(QuestionProblem::EmptyQuestionText);
            }
            if blank(answer) {
                return Err(QuestionProblem::EmptyAnswer);
            }
            Ok(())
        }
        QuestionDraft::Match { match_pairs, .. } => {
            if match_pairs.len() < MIN_PAIRS {
                return Err(QuestionProblem::NoPairs);
            }
            for (position, pair) in match_pairs.iter().enumerate() {
                if blank(&pair.left) || blank(&pair.right) {
                    return Err(QuestionProblem::IncompletePair { position });
                }
            }
            Ok(())
        }
    }
}
