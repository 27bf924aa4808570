use farkle_engine::ServerMessage;
use rand::{seq::SliceRandom, Rng};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::scoreboard::ScoreboardHandle;
use crate::session::{Session, TurnOutcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Won(String),
    Abandoned(String),
    /// Nobody was seated.
    Empty,
}

/// One game among a fixed set of sessions.
pub struct Table<S> {
    sessions: Vec<Session<S>>,
    goal: u32,
    scoreboard: Option<ScoreboardHandle>,
}

impl<S> Table<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Seats the sessions in a random order that holds for the whole game.
    pub fn new<R: Rng + ?Sized>(
        mut sessions: Vec<Session<S>>,
        goal: u32,
        scoreboard: Option<ScoreboardHandle>,
        rng: &mut R,
    ) -> Self {
        sessions.shuffle(rng);
        Self { sessions, goal, scoreboard }
    }

    pub fn names(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.name().to_string()).collect()
    }

    /// Plays until someone wins or drops out. Every session is kicked afterwards.
    pub async fn run(mut self) -> GameOutcome {
        if self.sessions.is_empty() {
            warn!("table has no players");
            return GameOutcome::Empty;
        }
        let names = self.names();
        info!(players = ?names, goal = self.goal, "starting table");
        self.broadcast(&ServerMessage::Starting(names)).await;

        let outcome = self.play_rounds().await;
        for session in &mut self.sessions {
            session.kick().await;
        }
        info!(?outcome, "table finished");
        outcome
    }

    async fn play_rounds(&mut self) -> GameOutcome {
        loop {
            for idx in 0..self.sessions.len() {
                if self.sessions[idx].run_turn().await == TurnOutcome::Disconnected {
                    let name = self.sessions[idx].name().to_string();
                    warn!(player = %name, "player left, closing table");
                    if let Some(board) = &self.scoreboard {
                        board.record_loss(&name);
                        board.record_played(std::slice::from_ref(&name));
                    }
                    return GameOutcome::Abandoned(name);
                }

                let session = &self.sessions[idx];
                debug!(player = session.name(), total = session.player().total_score(), "turn done");
                if session.player().win(self.goal) {
                    let name = session.name().to_string();
                    info!(player = %name, total = session.player().total_score(), "winner");
                    self.broadcast(&ServerMessage::Winner(name.clone())).await;
                    if let Some(board) = &self.scoreboard {
                        board.record_win(&name);
                        board.record_played(&self.names());
                    }
                    return GameOutcome::Won(name);
                }
            }
        }
    }

    /// Failures are only logged; the peer may already be gone.
    async fn broadcast(&mut self, msg: &ServerMessage) {
        for session in &mut self.sessions {
            if let Err(err) = session.send(msg).await {
                debug!(player = session.name(), error = %err, "broadcast not delivered");
            }
        }
    }
}
