use crate::exam::question::{MatchPair, QuestionKind};

use super::{EditError, QuestionEdit, MIN_PAIRS};

pub(super) fn apply(pairs: &mut Vec<MatchPair>, edit: QuestionEdit) -> Result<(), EditError> {
    match edit {
        QuestionEdit::AddPair => {
            pairs.push(MatchPair::empty());
            Ok(())
        }
        QuestionEdit::EditPairLeft { pair_id, text } => {
            let pair = find_pair(pairs, &pair_id)?;
            pair.left = text;
            Ok(())
        }
        QuestionEdit::EditPairRight { pair_id, text } => {
            let pair = find_pair(pairs, &pair_id)?;
            pair.right = text;
            Ok(())
        }
        QuestionEdit::RemovePair { pair_id } => {
            let position = pairs
                .iter()
                .position(|pair| pair.id == pair_id)
                .ok_or_else(|| EditError::UnknownPair(pair_id.clone()))?;

            if pairs.len() <= MIN_PAIRS {
                return Err(EditError::MinimumPairs);
            }

            pairs.remove(position);
            Ok(())
        }
        other => Err(EditError::Unsupported { kind: QuestionKind::Match, edit: other.name() }),
    }
}

fn find_pair<'a>(
    pairs: &'a mut [MatchPair],
    pair_id: &str,
) -> Result<&'a mut MatchPair, EditError> {
    pairs
        .iter_mut()
        .find(|pair| pair.id == pair_id)
        .ok_or_else(|| EditError::UnknownPair(pair_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::{apply, EditError, QuestionEdit};
    use crate::exam::question::{MatchPair, QuestionDraft, QuestionKind};

    fn pairs_of(draft: &QuestionDraft) -> &[MatchPair] {
        let QuestionDraft::Match { match_pairs, .. } = draft else { panic!("wrong variant") };
        match_pairs
    }

    #[test]
    fn pairs_are_independently_editable() {
        let mut draft = QuestionDraft::default_for(QuestionKind::Match);
        apply(&mut draft, QuestionEdit::AddPair).unwrap();

        let ids: Vec<String> = pairs_of(&draft).iter().map(|pair| pair.id.clone()).collect();
        apply(&mut draft, QuestionEdit::EditPairLeft { pair_id: ids[0].clone(), text: "H2O".into() })
            .unwrap();
        apply(
            &mut draft,
            QuestionEdit::EditPairRight { pair_id: ids[1].clone(), text: "salt".into() },
        )
        .unwrap();

        let pairs = pairs_of(&draft);
        assert_eq!(pairs[0].left, "H2O");
        assert_eq!(pairs[0].right, "");
        assert_eq!(pairs[1].left, "");
        assert_eq!(pairs[1].right, "salt");
    }

    #[test]
    fn keeps_at_least_one_pair() {
        let mut draft = QuestionDraft::default_for(QuestionKind::Match);
        let id = pairs_of(&draft)[0].id.clone();

        let err = apply(&mut draft, QuestionEdit::RemovePair { pair_id: id }).unwrap_err();
        assert_eq!(err, EditError::MinimumPairs);

        apply(&mut draft, QuestionEdit::AddPair).unwrap();
        let id = pairs_of(&draft)[0].id.clone();
        apply(&mut draft, QuestionEdit::RemovePair { pair_id: id }).unwrap();
        assert_eq!(pairs_of(&draft).len(), 1);
    }

    #[test]
    fn unknown_pair_id_is_reported() {
        let mut draft = QuestionDraft::default_for(QuestionKind::Match);
        let err = apply(
            &mut draft,
            QuestionEdit::EditPairLeft { pair_id: "missing".into(), text: "x".into() },
        )
        .unwrap_err();
        assert_eq!(err, EditError::UnknownPair("missing".into()));
    }
}
