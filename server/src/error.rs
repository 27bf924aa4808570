//! Error types for the table server.
//!
//! `CommandError` covers everything a peer can get wrong; it is reported back
//! and costs one attempt. `TransportError` means the peer is gone.

use std::io;

use farkle_engine::{ProtocolError, ScoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no command received within {0:?}")]
    Timeout(std::time::Duration),
    #[error("peer stopped reading for {0:?}")]
    Stalled(std::time::Duration),
    #[error("connection closed by peer")]
    Closed,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}")]
    Malformed(#[from] ProtocolError),
    #[error("{0}")]
    Selection(#[from] ScoreError),
    #[error("need at least one die to keep")]
    NothingKept,
    #[error("cannot bank in partial turn")]
    BankMidHand,
    #[error("cannot change name after first turn")]
    NameLocked,
    #[error("name cannot be empty")]
    EmptyName,
}

impl CommandError {
    /// Stable tag sent in `ERROR:` lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Malformed(_) => "MalformedCommand",
            CommandError::Selection(_) => "InvalidSelection",
            CommandError::NothingKept
            | CommandError::BankMidHand
            | CommandError::NameLocked
            | CommandError::EmptyName => "InvalidCommand",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_domain_failures() {
        assert_eq!(CommandError::from(ScoreError::LoneDie(4)).kind(), "InvalidSelection");
        assert_eq!(CommandError::from(ProtocolError::Empty).kind(), "MalformedCommand");
        assert_eq!(CommandError::BankMidHand.kind(), "InvalidCommand");
        assert_eq!(CommandError::from(ScoreError::LoneDie(4)).to_string(), "cannot use 4 alone");
    }
}
