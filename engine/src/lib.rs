pub mod model;
pub mod rng;
pub mod rules;
pub mod player;
pub mod protocol;
pub mod bot;

pub use model::*;
pub use player::PlayerState;
pub use protocol::{ClientCommand, ProtocolError, ServerMessage, PROMPT};
pub use rng::{DiceSource, RandomDice};
pub use rules::{evaluate, ScoreError};
