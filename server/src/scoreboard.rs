//! Win/loss bookkeeping shared by every table.
//!
//! Tables never wait on the scoreboard: events go through a bounded queue and
//! are dropped with a warning when it is full.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_QUEUE: usize = 256;
const FEED_CAPACITY: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoreEvent {
    Win(String),
    Loss(String),
    Played(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct ScoreboardHandle {
    tx: mpsc::Sender<ScoreEvent>,
}

impl ScoreboardHandle {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ScoreEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn record_win(&self, name: &str) { self.push(ScoreEvent::Win(name.to_string())) }
    pub fn record_loss(&self, name: &str) { self.push(ScoreEvent::Loss(name.to_string())) }
    pub fn record_played(&self, names: &[String]) { self.push(ScoreEvent::Played(names.to_vec())) }

    fn push(&self, event: ScoreEvent) {
        if let Err(err) = self.tx.try_send(event) {
            warn!(error = %err, "scoreboard event dropped");
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub count: u64,
    pub won: u64,
    pub lost: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Standings {
    pub title: String,
    pub scores: Vec<PlayerRecord>,
}

pub struct Scoreboard {
    title: String,
    records: BTreeMap<String, PlayerRecord>,
    feed: broadcast::Sender<Standings>,
}

impl Scoreboard {
    pub fn new(title: impl Into<String>) -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self { title: title.into(), records: BTreeMap::new(), feed }
    }

    /// Fresh standings after every applied event.
    pub fn subscribe(&self) -> broadcast::Receiver<Standings> { self.feed.subscribe() }

    pub fn apply(&mut self, event: ScoreEvent) {
        match event {
            ScoreEvent::Win(name) => self.record(&name).won += 1,
            ScoreEvent::Loss(name) => self.record(&name).lost += 1,
            ScoreEvent::Played(names) => {
                for name in names { self.record(&name).count += 1; }
            }
        }
        // no subscribers is fine
        let _ = self.feed.send(self.standings());
    }

    pub fn record_of(&self, name: &str) -> Option<&PlayerRecord> { self.records.get(name) }

    pub fn standings(&self) -> Standings {
        Standings { title: self.title.clone(), scores: self.records.values().cloned().collect() }
    }

    fn record(&mut self, name: &str) -> &mut PlayerRecord {
        self.records
            .entry(name.to_string())
            .or_insert_with(|| PlayerRecord { name: name.to_string(), ..Default::default() })
    }

    /// Consumes events until every handle is dropped, then hands the board back.
    pub fn spawn(mut self, capacity: usize) -> (ScoreboardHandle, JoinHandle<Scoreboard>) {
        let (handle, mut rx) = ScoreboardHandle::channel(capacity);
        let task = tokio::spawn(async move {
            info!(title = %self.title, "scoreboard started");
            while let Some(event) = rx.recv().await {
                debug!(?event, "scoreboard event");
                self.apply(event);
            }
            info!(players = self.records.len(), "scoreboard stopped");
            self
        });
        (handle, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_follow_events() {
        let mut board = Scoreboard::new("test");
        board.apply(ScoreEvent::Played(vec!["ada".into(), "bob".into()]));
        board.apply(ScoreEvent::Win("ada".into()));
        board.apply(ScoreEvent::Loss("bob".into()));

        assert_eq!(board.record_of("ada"), Some(&PlayerRecord { name: "ada".into(), count: 1, won: 1, lost: 0 }));
        assert_eq!(board.record_of("bob"), Some(&PlayerRecord { name: "bob".into(), count: 1, won: 0, lost: 1 }));
    }

    #[test]
    fn standings_serialize_like_the_feed() {
        let mut board = Scoreboard::new("friday");
        board.apply(ScoreEvent::Win("ada".into()));
        let json = serde_json::to_value(board.standings()).unwrap();
        assert_eq!(json["title"], "friday");
        assert_eq!(json["scores"][0]["won"], 1);
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (handle, mut rx) = ScoreboardHandle::channel(1);
        handle.record_win("ada");
        handle.record_loss("bob");
        assert_eq!(rx.try_recv().unwrap(), ScoreEvent::Win("ada".into()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn spawned_board_publishes_and_returns() {
        let board = Scoreboard::new("live");
        let mut feed = board.subscribe();
        let (handle, task) = board.spawn(DEFAULT_QUEUE);

        handle.record_played(&["ada".to_string()]);
        let standings = feed.recv().await.unwrap();
        assert_eq!(standings.scores[0].count, 1);

        drop(handle);
        let board = task.await.unwrap();
        assert_eq!(board.record_of("ada").map(|r| r.count), Some(1));
    }
}
