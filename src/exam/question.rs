use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaState;

pub const TRUE_ANSWER: &str = "True";
pub const FALSE_ANSWER: &str = "False";

/// The six question types an exam can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FillBlanks,
    ShortAnswer,
    Reasoning,
    Match,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 6] = [
        QuestionKind::MultipleChoice,
        QuestionKind::TrueFalse,
        QuestionKind::FillBlanks,
        QuestionKind::ShortAnswer,
        QuestionKind::Reasoning,
        QuestionKind::Match,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
            Self::FillBlanks => "fill-blanks",
            Self::ShortAnswer => "short-answer",
            Self::Reasoning => "reasoning",
            Self::Match => "match",
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a multiple-choice question. The id is assigned at
/// creation and never derived from position, so reordering or editing one
/// option cannot corrupt another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

impl ChoiceOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), text: text.into() }
    }

    pub fn empty() -> Self {
        Self::new("")
    }
}

/// One left/right pair of a matching question, with the same stable-id rule
/// as [`ChoiceOption`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub id: String,
    pub left: String,
    pub right: String,
}

impl MatchPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), left: left.into(), right: right.into() }
    }

    pub fn empty() -> Self {
        Self::new("", "")
    }
}

/// An in-progress question. Tagged on `type` in the persisted form, matching
/// the source documents; every variant carries its media attachment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum QuestionDraft {
    MultipleChoice {
        question: String,
        options: Vec<ChoiceOption>,
        answer: String,
        #[serde(default)]
        media: MediaState,
    },
    TrueFalse {
        question: String,
        answer: String,
        #[serde(default)]
        media: MediaState,
    },
    FillBlanks {
        question: String,
        answer: String,
        #[serde(default)]
        media: MediaState,
    },
    ShortAnswer {
        question: String,
        answer: String,
        #[serde(default)]
        media: MediaState,
    },
    Reasoning {
        question: String,
        answer: String,
        #[serde(default)]
        media: MediaState,
    },
    Match {
        match_pairs: Vec<MatchPair>,
        #[serde(default)]
        media: MediaState,
    },
}

impl QuestionDraft {
    /// Default shape for a freshly-added question. Every default satisfies
    /// its type's minimum structural shape: multiple choice starts with two
    /// (empty) options, match starts with one (empty) pair.
    pub fn default_for(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice => Self::MultipleChoice {
                question: String::new(),
                options: vec![ChoiceOption::empty(), ChoiceOption::empty()],
                answer: String::new(),
                media: MediaState::Absent,
            },
            QuestionKind::TrueFalse => Self::TrueFalse {
                question: String::new(),
                answer: String::new(),
                media: MediaState::Absent,
            },
            QuestionKind::FillBlanks => Self::FillBlanks {
                question: String::new(),
                answer: String::new(),
                media: MediaState::Absent,
            },
            QuestionKind::ShortAnswer => Self::ShortAnswer {
                question: String::new(),
                answer: String::new(),
                media: MediaState::Absent,
            },
            QuestionKind::Reasoning => Self::Reasoning {
                question: String::new(),
                answer: String::new(),
                media: MediaState::Absent,
            },
            QuestionKind::Match => Self::Match {
                match_pairs: vec![MatchPair::empty()],
                media: MediaState::Absent,
            },
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Self::TrueFalse { .. } => QuestionKind::TrueFalse,
            Self::FillBlanks { .. } => QuestionKind::FillBlanks,
            Self::ShortAnswer { .. } => QuestionKind::ShortAnswer,
            Self::Reasoning { .. } => QuestionKind::Reasoning,
            Self::Match { .. } => QuestionKind::Match,
        }
    }

    pub fn media(&self) -> &MediaState {
        match self {
            Self::MultipleChoice { media, .. }
            | Self::TrueFalse { media, .. }
            | Self::FillBlanks { media, .. }
            | Self::ShortAnswer { media, .. }
            | Self::Reasoning { media, .. }
            | Self::Match { media, .. } => media,
        }
    }

    pub fn media_mut(&mut self) -> &mut MediaState {
        match self {
            Self::MultipleChoice { media, .. }
            | Self::TrueFalse { media, .. }
            | Self::FillBlanks { media, .. }
            | Self::ShortAnswer { media, .. }
            | Self::Reasoning { media, .. }
            | Self::Match { media, .. } => media,
        }
    }

    pub fn has_pending_media(&self) -> bool {
        self.media().is_pending()
    }
}
