use anyhow::bail;
use farkle_engine::bot::{self, Decision};
use farkle_engine::{BotLevel, ClientCommand, ServerMessage, TurnSnapshot};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::channel::LineChannel;
use crate::error::TransportError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientReport {
    pub players: Vec<String>,
    pub winner: Option<String>,
    pub last_state: Option<TurnSnapshot>,
    pub commands_sent: usize,
    pub rejected: usize,
}

/// Plays a whole game with the bot policy: names itself on the first prompt,
/// then answers every prompt from the latest `STATE`. Ends on `KICK` or EOF.
pub async fn play<S>(stream: S, name: &str, level: BotLevel) -> anyhow::Result<ClientReport>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut channel = LineChannel::new(stream, None);
    let mut report = ClientReport::default();
    let mut name_sent = false;

    loop {
        let frame = match channel.recv_frame().await {
            Ok(frame) => frame,
            Err(TransportError::Closed) => break,
            Err(err) => return Err(err.into()),
        };
        let msg = match ServerMessage::parse(&frame) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable line");
                continue;
            }
        };
        match msg {
            ServerMessage::Starting(players) => {
                info!(?players, "game starting");
                report.players = players;
            }
            ServerMessage::State(state) => report.last_state = Some(state),
            ServerMessage::Prompt => {
                let command = if !name_sent {
                    name_sent = true;
                    ClientCommand::Name(name.to_string())
                } else {
                    let Some(state) = &report.last_state else { bail!("prompted before any state was sent") };
                    match bot::decide(state, level) {
                        Decision::Play(selection) => ClientCommand::Play(selection),
                        Decision::Bank => ClientCommand::Bank,
                        Decision::Trash => ClientCommand::Trash,
                    }
                };
                debug!(%command, "sending");
                channel.send(&format!("{command}\n")).await?;
                report.commands_sent += 1;
            }
            ServerMessage::Error { kind, message } => {
                warn!(%kind, %message, "command rejected");
                report.rejected += 1;
            }
            ServerMessage::Trash => warn!("turn trashed by the server"),
            ServerMessage::Winner(winner) => {
                info!(%winner, "game won");
                report.winner = Some(winner);
            }
            ServerMessage::Kick => {
                info!("kicked");
                break;
            }
        }
    }
    Ok(report)
}
