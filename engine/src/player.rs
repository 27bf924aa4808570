use crate::model::{DiceRoll, Selection, TurnSnapshot, FULL_ROLL, MAX_HANDS};
use crate::rng::DiceSource;
use crate::rules::{evaluate, ScoreError};

/// One player's progress through the game.
pub struct PlayerState {
    total_score: u32,
    turn_score: u32,
    played_hands: u32,
    played_turns: u32,
    dice: DiceRoll,
    source: Box<dyn DiceSource>,
}

impl PlayerState {
    pub fn new(source: impl DiceSource + 'static) -> Self {
        let mut source: Box<dyn DiceSource> = Box::new(source);
        let dice = source.roll(FULL_ROLL);
        Self { total_score: 0, turn_score: 0, played_hands: 0, played_turns: 0, dice, source }
    }

    pub fn total_score(&self) -> u32 { self.total_score }
    pub fn turn_score(&self) -> u32 { self.turn_score }
    pub fn played_hands(&self) -> u32 { self.played_hands }
    pub fn played_turns(&self) -> u32 { self.played_turns }
    pub fn dice(&self) -> &[u8] { &self.dice }

    /// Banking is only allowed on a full roll, before any die of it is kept.
    pub fn can_bank(&self) -> bool { self.dice.len() == FULL_ROLL }

    /// Every die was scored on the last allowed hand; only `finish_turn` is left.
    pub fn hand_limit_reached(&self) -> bool { self.dice.is_empty() }

    /// Plays one hand. Returns whether the turn can continue. Nothing changes on error.
    pub fn play(&mut self, selection: &Selection) -> Result<bool, ScoreError> {
        let outcome = evaluate(&self.dice, selection)?;
        self.turn_score += outcome.score;

        let mut remaining = outcome.remaining;
        if remaining == 0 {
            if self.played_hands == MAX_HANDS {
                self.dice.clear();
                return Ok(false);
            }
            self.played_hands += 1;
            remaining = FULL_ROLL;
        }
        self.dice = self.source.roll(remaining);
        Ok(true)
    }

    /// Ends the turn, banking the turn score when `accumulate` is set.
    pub fn finish_turn(&mut self, accumulate: bool) {
        if accumulate { self.total_score += self.turn_score; }
        self.played_turns += 1;
        self.played_hands = 0;
        self.turn_score = 0;
        self.dice = self.source.roll(FULL_ROLL);
    }

    pub fn win(&self, goal: u32) -> bool { self.total_score >= goal }

    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            total_score: self.total_score,
            turn_score: self.turn_score,
            played_hands: self.played_hands,
            played_turns: self.played_turns,
            dice: self.dice.clone(),
        }
    }
}

impl std::fmt::Debug for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerState")
            .field("total_score", &self.total_score)
            .field("turn_score", &self.turn_score)
            .field("played_hands", &self.played_hands)
            .field("played_turns", &self.played_turns)
            .field("dice", &self.dice)
            .finish()
    }
}
