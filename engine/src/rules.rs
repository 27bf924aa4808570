use thiserror::Error;

use crate::model::{Face, ScoreOutcome, Selection, FULL_ROLL};

const FIVE_THOUSAND: [Face; 5] = [5, 5, 5, 5, 5];
const SMALL_STRAIGHT: [Face; 5] = [1, 2, 3, 4, 5];
const LARGE_STRAIGHT: [Face; 5] = [2, 3, 4, 5, 6];

pub const FIVE_THOUSAND_SCORE: u32 = 5000;
pub const STRAIGHT_SCORE: u32 = 1500;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("must keep at least one die")]
    EmptySelection,
    #[error("die index {index} is out of range for {len} dice")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot use {0} alone")]
    LoneDie(Face),
}

#[inline] pub fn triple_score(face: Face) -> u32 { 100 * face as u32 }

#[inline] pub fn single_score(face: Face) -> Option<u32> {
    match face { 1 => Some(100), 5 => Some(50), _ => None }
}

/// Scores the dice kept by `selection` out of `roll`.
pub fn evaluate(roll: &[Face], selection: &Selection) -> Result<ScoreOutcome, ScoreError> {
    if selection.is_empty() { return Err(ScoreError::EmptySelection); }
    let mut kept = Vec::with_capacity(selection.len());
    for &index in selection {
        let face = roll.get(index).copied().ok_or(ScoreError::IndexOutOfRange { index, len: roll.len() })?;
        kept.push(face);
    }
    kept.sort_unstable();
    let remaining = roll.len() - kept.len();

    if kept == FIVE_THOUSAND {
        return Ok(ScoreOutcome { remaining, score: FIVE_THOUSAND_SCORE });
    }
    if kept == SMALL_STRAIGHT || kept == LARGE_STRAIGHT {
        return Ok(ScoreOutcome { remaining, score: STRAIGHT_SCORE });
    }

    let mut score = 0;
    let mut i = 0;
    while i < kept.len() {
        if i + 2 < kept.len() && kept[i] == kept[i + 1] && kept[i] == kept[i + 2] {
            score += triple_score(kept[i]);
            i += 3;
            continue;
        }
        score += single_score(kept[i]).ok_or(ScoreError::LoneDie(kept[i]))?;
        i += 1;
    }
    Ok(ScoreOutcome { remaining, score })
}

/// Every non-empty selection of `roll` that scores, best first.
pub fn scoring_selections(roll: &[Face]) -> Vec<(Selection, ScoreOutcome)> {
    let len = roll.len().min(FULL_ROLL);
    let mut found: Vec<(Selection, ScoreOutcome)> = (1u32..(1 << len))
        .filter_map(|mask| {
            let sel: Selection = (0..len).filter(|i| mask & (1 << i) != 0).collect();
            evaluate(roll, &sel).ok().map(|outcome| (sel, outcome))
        })
        .collect();
    found.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(b.1.remaining.cmp(&a.1.remaining)));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::selection;

    fn all(roll: &[Face]) -> Selection { selection(0..roll.len()) }

    #[test]
    fn five_fives_is_five_thousand() {
        let roll = [5, 5, 5, 5, 5];
        assert_eq!(evaluate(&roll, &all(&roll)), Ok(ScoreOutcome { remaining: 0, score: 5000 }));
    }

    #[test]
    fn straights_score_1500() {
        for roll in [[2, 3, 4, 5, 6], [1, 2, 3, 4, 5], [6, 2, 5, 3, 4]] {
            assert_eq!(evaluate(&roll, &all(&roll)), Ok(ScoreOutcome { remaining: 0, score: 1500 }));
        }
    }

    #[test]
    fn triples_and_singles() {
        assert_eq!(evaluate(&[2, 6, 3, 3, 3], &selection([2, 3, 4])), Ok(ScoreOutcome { remaining: 2, score: 300 }));
        assert_eq!(evaluate(&[5, 1, 3, 3, 3], &selection(0..5)), Ok(ScoreOutcome { remaining: 0, score: 450 }));
        assert_eq!(evaluate(&[5, 6, 3, 3, 3], &selection([0, 2, 3, 4])), Ok(ScoreOutcome { remaining: 1, score: 350 }));
        assert_eq!(evaluate(&[1], &selection([0])), Ok(ScoreOutcome { remaining: 0, score: 100 }));
        assert_eq!(evaluate(&[1, 3, 3, 3], &selection(0..4)), Ok(ScoreOutcome { remaining: 0, score: 400 }));
    }

    #[test]
    fn overlapping_triples_are_not_double_counted() {
        // 1,1,1 triple then two loose ones
        assert_eq!(evaluate(&[1, 1, 1, 1, 1], &selection(0..5)), Ok(ScoreOutcome { remaining: 0, score: 300 }));
        assert_eq!(evaluate(&[2, 2, 2, 2, 5], &selection(0..5)), Err(ScoreError::LoneDie(2)));
    }

    #[test]
    fn duplicate_indices_collapse() {
        let sel: Selection = [0, 0, 0].into_iter().collect();
        assert_eq!(evaluate(&[1, 2, 2], &sel), Ok(ScoreOutcome { remaining: 2, score: 100 }));
    }

    #[test]
    fn empty_selection_always_fails() {
        for roll in [vec![1], vec![5, 5, 5, 5, 5], vec![2, 3, 4, 5, 6]] {
            assert_eq!(evaluate(&roll, &Selection::new()), Err(ScoreError::EmptySelection));
        }
    }

    #[test]
    fn lone_two_fails() {
        let err = evaluate(&[2, 1, 5, 4, 6], &selection([0, 1])).unwrap_err();
        assert_eq!(err, ScoreError::LoneDie(2));
        assert_eq!(err.to_string(), "cannot use 2 alone");
    }

    #[test]
    fn out_of_range_index_fails() {
        assert_eq!(evaluate(&[1, 5], &selection([2])), Err(ScoreError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn evaluate_is_deterministic() {
        let roll = [3, 1, 3, 5, 3];
        let sel = selection([0, 1, 2, 4]);
        assert_eq!(evaluate(&roll, &sel), evaluate(&roll, &sel));
    }

    #[test]
    fn scoring_selections_ranks_best_first() {
        let found = scoring_selections(&[1, 5, 2, 2, 4]);
        assert_eq!(found[0].0, selection([0, 1]));
        assert_eq!(found[0].1.score, 150);
        assert!(scoring_selections(&[2, 3, 4, 6, 6]).is_empty());
    }
}
