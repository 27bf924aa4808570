use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use farkle_engine::{PlayerState, RandomDice};
use rand::{rngs::StdRng, SeedableRng};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn, Instrument};

use crate::config::ServerConfig;
use crate::scoreboard::ScoreboardHandle;
use crate::session::Session;
use crate::table::Table;

/// Fills tables from incoming connections, one game task per table.
pub struct TableServer {
    listener: TcpListener,
    config: ServerConfig,
    scoreboard: Option<ScoreboardHandle>,
    seating: StdRng,
    pending: Vec<(TcpStream, SocketAddr)>,
    tables: u64,
}

impl TableServer {
    pub async fn bind(config: ServerConfig, scoreboard: Option<ScoreboardHandle>) -> anyhow::Result<Self> {
        let addr = config.addr();
        let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
        let seating = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ 0x5EED),
            None => StdRng::from_entropy(),
        };
        Ok(Self { listener, config, scoreboard, seating, pending: Vec::new(), tables: 0 })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> { self.listener.local_addr() }

    /// Waits until every seat is taken and returns the seated table with its number.
    /// Players already waiting keep their seat if an accept fails.
    pub async fn next_table(&mut self) -> io::Result<(u64, Table<TcpStream>)> {
        let seats = self.config.seats;
        while self.pending.len() < seats {
            let (stream, peer) = self.listener.accept().await?;
            if let Err(err) = stream.set_nodelay(true) {
                warn!(%peer, error = %err, "could not disable nagle");
            }
            info!(%peer, waiting_for = seats - self.pending.len() - 1, "player connected");
            self.pending.push((stream, peer));
        }
        let seated = std::mem::take(&mut self.pending);

        self.tables += 1;
        let table_no = self.tables;
        let sessions: Vec<Session<TcpStream>> = seated
            .into_iter()
            .enumerate()
            .map(|(seat, (stream, peer))| {
                let dice = match self.config.seed {
                    Some(seed) => RandomDice::seeded(seed ^ table_no.wrapping_mul(7919) ^ (seat as u64).wrapping_mul(104729)),
                    None => RandomDice::from_entropy(),
                };
                Session::new(peer.to_string(), stream, PlayerState::new(dice), self.config.io_timeout())
            })
            .collect();
        let table = Table::new(sessions, self.config.goal, self.scoreboard.clone(), &mut self.seating);
        Ok((table_no, table))
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(addr = %self.local_addr()?, seats = self.config.seats, goal = self.config.goal, "server started");
        loop {
            match self.next_table().await {
                Ok((table_no, table)) => {
                    tokio::spawn(async move { table.run().await }.instrument(tracing::info_span!("table", id = table_no)));
                }
                Err(err) => {
                    warn!(error = %err, "accept failed");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}
