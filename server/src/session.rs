use std::time::Duration;

use farkle_engine::{ClientCommand, PlayerState, ServerMessage};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn, Instrument};

use crate::channel::LineChannel;
use crate::error::{CommandError, TransportError};

/// Consecutive rejected commands tolerated before the turn is trashed.
pub const MAX_ATTEMPTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Disconnected,
}

/// One remote player seated at a table.
pub struct Session<S> {
    name: String,
    player: PlayerState,
    channel: LineChannel<S>,
    connected: bool,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(name: impl Into<String>, stream: S, player: PlayerState, timeout: Option<Duration>) -> Self {
        Self { name: name.into(), player, channel: LineChannel::new(stream, timeout), connected: true }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn player(&self) -> &PlayerState { &self.player }
    pub fn is_connected(&self) -> bool { self.connected }

    pub async fn send(&mut self, msg: &ServerMessage) -> Result<(), TransportError> {
        let sent = self.channel.send_message(msg).await;
        if sent.is_err() { self.connected = false; }
        sent
    }

    /// Applies one parsed command. `Ok(true)` keeps the turn going.
    pub fn apply(&mut self, command: ClientCommand) -> Result<bool, CommandError> {
        match command {
            ClientCommand::Trash => {
                self.player.finish_turn(false);
                Ok(false)
            }
            ClientCommand::Bank => {
                if !self.player.can_bank() { return Err(CommandError::BankMidHand); }
                self.player.finish_turn(true);
                Ok(false)
            }
            ClientCommand::Name(name) => {
                if self.player.played_turns() > 0 { return Err(CommandError::NameLocked); }
                if name.is_empty() { return Err(CommandError::EmptyName); }
                info!(from = %self.name, to = %name, "player renamed");
                self.name = name;
                Ok(true)
            }
            ClientCommand::Play(selection) => {
                if selection.is_empty() { return Err(CommandError::NothingKept); }
                Ok(self.player.play(&selection)?)
            }
        }
    }

    pub fn run_line(&mut self, line: &str) -> Result<bool, CommandError> {
        let command = ClientCommand::parse(line)?;
        self.apply(command)
    }

    /// Runs this player's turn to completion. Only a transport failure stops it early.
    pub async fn run_turn(&mut self) -> TurnOutcome {
        let span = tracing::info_span!("turn", player = %self.name, turn = self.player.played_turns() + 1);
        match self.play_turn().instrument(span).await {
            Ok(()) => TurnOutcome::Completed,
            Err(err) => {
                warn!(player = %self.name, error = %err, "player disconnected");
                self.connected = false;
                TurnOutcome::Disconnected
            }
        }
    }

    async fn play_turn(&mut self) -> Result<(), TransportError> {
        let mut can_play = true;
        while can_play {
            let mut accepted = false;
            for attempt in 1..=MAX_ATTEMPTS {
                let state = ServerMessage::State(self.player.snapshot());
                self.send(&state).await?;
                self.send(&ServerMessage::Prompt).await?;

                let line = self.channel.recv_line().await?;
                debug!(line = line.trim_end(), "received");
                match self.run_line(&line) {
                    Ok(more) => {
                        can_play = more;
                        accepted = true;
                        break;
                    }
                    Err(err) => {
                        warn!(attempt, max = MAX_ATTEMPTS, kind = err.kind(), error = %err, "rejected command");
                        let reply = ServerMessage::Error { kind: err.kind().to_string(), message: err.to_string() };
                        self.send(&reply).await?;
                    }
                }
            }
            if !accepted {
                warn!(turn_score = self.player.turn_score(), "too many invalid commands, trashing turn");
                self.player.finish_turn(false);
                can_play = false;
                self.send(&ServerMessage::Trash).await?;
            }
        }

        if self.player.hand_limit_reached() {
            info!(turn_score = self.player.turn_score(), "hand limit reached, banking");
            self.player.finish_turn(true);
        }
        Ok(())
    }

    /// Sends `KICK` if the peer still listens, then closes the connection.
    /// Both steps give up after the channel timeout.
    pub async fn kick(&mut self) {
        if let Err(err) = self.channel.send_message(&ServerMessage::Kick).await {
            debug!(player = %self.name, error = %err, "kick not delivered");
        }
        self.channel.close().await;
        self.connected = false;
        info!(player = %self.name, "closed connection");
    }
}
