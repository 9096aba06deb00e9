use crate::exam::forms::{self, EditError, QuestionEdit};
use crate::exam::question::{QuestionDraft, QuestionKind};

/// View-vs-edit mode of an editing session. The switch to read-only is
/// one-way; a read-only session never becomes editable again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Editing,
    ReadOnly,
}

/// The ordered sequence of question drafts under an exam. Owns every
/// structural operation on the list; field-level edits are forwarded to the
/// per-type editors.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionList {
    questions: Vec<QuestionDraft>,
    mode: EditorMode,
}

impl QuestionList {
    /// A fresh authoring session starts with one default multiple-choice
    /// question, as the source form does.
    pub fn new() -> Self {
        Self {
            questions: vec![QuestionDraft::default_for(QuestionKind::MultipleChoice)],
            mode: EditorMode::Editing,
        }
    }

    pub fn from_questions(questions: Vec<QuestionDraft>, mode: EditorMode) -> Self {
        Self { questions, mode }
    }

    pub fn questions(&self) -> &[QuestionDraft] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_readonly(&mut self) {
        self.mode = EditorMode::ReadOnly;
    }

    fn ensure_editable(&self) -> Result<(), EditError> {
        match self.mode {
            EditorMode::Editing => Ok(()),
            EditorMode::ReadOnly => Err(EditError::ReadOnly),
        }
    }

    fn ensure_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(EditError::OutOfRange(index))
        }
    }

    /// Append a default-shaped question of the requested type.
    pub fn add_question(&mut self, kind: QuestionKind) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.questions.push(QuestionDraft::default_for(kind));
        Ok(())
    }

    /// Overwrite the draft at `index`; the onChange path from a hosting UI
    /// that edits a whole question at once.
    pub fn replace_question(&mut self, index: usize, draft: QuestionDraft) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;
        self.questions[index] = draft;
        Ok(())
    }

    /// Apply one field edit to the question at `index`.
    pub fn edit_question(&mut self, index: usize, edit: QuestionEdit) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;
        forms::apply(&mut self.questions[index], edit)
    }

    /// Remove the question at `index` after the hosting shell confirms with
    /// the user. Returns whether the question was actually removed.
    pub fn delete_question(
        &mut self,
        index: usize,
        confirm: impl FnOnce(&QuestionDraft) -> bool,
    ) -> Result<bool, EditError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;

        if !confirm(&self.questions[index]) {
            return Ok(false);
        }

        self.questions.remove(index);
        Ok(true)
    }

    /// Swap the question at `index` with its neighbor. A move past either end
    /// of the list leaves the order unchanged.
    pub fn move_question(&mut self, index: usize, direction: MoveDirection) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;

        let neighbor = match direction {
            MoveDirection::Up => {
                let Some(neighbor) = index.checked_sub(1) else { return Ok(()) };
                neighbor
            }
            MoveDirection::Down => {
                if index + 1 >= self.questions.len() {
                    return Ok(());
                }
                index + 1
            }
        };

        self.questions.swap(index, neighbor);
        Ok(())
    }

    /// Reposition the question at `old_index` to `new_index` (drag-and-drop).
    /// Pure permutation: every draft, including nested option and pair ids,
    /// is carried over untouched.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.ensure_index(old_index)?;
        self.ensure_index(new_index)?;

        let draft = self.questions.remove(old_index);
        self.questions.insert(new_index, draft);
        Ok(())
    }

    pub(crate) fn replace_all(&mut self, questions: Vec<QuestionDraft>) {
        self.questions = questions;
    }
}

impl Default for QuestionList {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}
