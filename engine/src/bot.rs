use crate::{model::{BotLevel, Selection, TurnSnapshot}, rules::scoring_selections};

/// Rough worth of each die left to reroll, used by the pro policy.
pub const REROLL_EV: f32 = 60.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision { Play(Selection), Bank, Trash }

pub fn bank_threshold(level: BotLevel) -> u32 {
    match level { BotLevel::Amateur => 300, BotLevel::Pro => 1000 }
}

pub fn decide(state: &TurnSnapshot, level: BotLevel) -> Decision {
    if state.can_bank() && state.turn_score >= bank_threshold(level) { return Decision::Bank; }
    let options = scoring_selections(&state.dice);
    let pick = match level {
        BotLevel::Amateur => options.into_iter().next(),
        BotLevel::Pro => options.into_iter().max_by(|a, b| line_value(&a.1).total_cmp(&line_value(&b.1))),
    };
    match pick {
        Some((sel, _)) => Decision::Play(sel),
        None if state.can_bank() && state.turn_score > 0 => Decision::Bank,
        None => Decision::Trash,
    }
}

fn line_value(outcome: &crate::model::ScoreOutcome) -> f32 {
    let rerolled = if outcome.remaining == 0 { 5 } else { outcome.remaining };
    outcome.score as f32 + REROLL_EV * rerolled as f32
}
