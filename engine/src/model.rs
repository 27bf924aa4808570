use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type Face = u8;
pub type DiceRoll = Vec<Face>;
pub type PlayerName = String;

/// Indices into the current roll. Duplicates collapse.
pub type Selection = BTreeSet<usize>;

pub const FULL_ROLL: usize = 5;
pub const MAX_HANDS: u32 = 3;
pub const DEFAULT_GOAL: u32 = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotLevel { Amateur, Pro }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub remaining: usize,
    pub score: u32,
}

/// What a peer sees of one player between commands.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TurnSnapshot {
    pub total_score: u32,
    pub turn_score: u32,
    pub played_hands: u32,
    pub played_turns: u32,
    #[serde(rename = "dices")]
    pub dice: DiceRoll,
}

impl TurnSnapshot {
    pub fn can_bank(&self) -> bool { self.dice.len() == FULL_ROLL }
}

#[cfg(test)]
pub(crate) fn selection<I: IntoIterator<Item = usize>>(indices: I) -> Selection {
    indices.into_iter().collect()
}
