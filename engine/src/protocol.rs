//! Line protocol spoken between the table server and its players.
//!
//! Every message is one newline-terminated line except the prompt, which is
//! sent bare so the peer can answer on the same line.

use std::fmt;

use serde_json::json;
use thiserror::Error;

use crate::model::{PlayerName, Selection, TurnSnapshot};

pub const PROMPT: &str = ">> ";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{0}` takes no argument")]
    UnexpectedArgument(&'static str),
    #[error("bad dice selection: {0}")]
    BadSelection(String),
    #[error("unrecognized server line `{0}`")]
    UnknownMessage(String),
    #[error("bad payload in `{line}`: {reason}")]
    BadPayload { line: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    Name(String),
    Play(Selection),
    Trash,
    Bank,
}

impl ClientCommand {
    /// Keywords are case-insensitive; `NAME` keeps the rest of the line verbatim.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        if line.is_empty() { return Err(ProtocolError::Empty); }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line, ""),
        };
        match keyword.to_ascii_uppercase().as_str() {
            "NAME" => Ok(ClientCommand::Name(rest.to_string())),
            "PLAY" => {
                let indices: Vec<usize> = serde_json::from_str(rest)
                    .map_err(|e| ProtocolError::BadSelection(e.to_string()))?;
                Ok(ClientCommand::Play(indices.into_iter().collect()))
            }
            "TRASH" if rest.is_empty() => Ok(ClientCommand::Trash),
            "BANK" if rest.is_empty() => Ok(ClientCommand::Bank),
            "TRASH" => Err(ProtocolError::UnexpectedArgument("TRASH")),
            "BANK" => Err(ProtocolError::UnexpectedArgument("BANK")),
            _ => Err(ProtocolError::UnknownCommand(keyword.to_string())),
        }
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::Name(name) => write!(f, "NAME {name}"),
            ClientCommand::Play(sel) => write!(f, "PLAY {}", json!(sel)),
            ClientCommand::Trash => f.write_str("TRASH"),
            ClientCommand::Bank => f.write_str("BANK"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    Starting(Vec<PlayerName>),
    State(TurnSnapshot),
    Prompt,
    Error { kind: String, message: String },
    Trash,
    Winner(PlayerName),
    Kick,
}

impl ServerMessage {
    /// Wire form, newline included where the protocol wants one.
    pub fn encode(&self) -> String {
        match self {
            ServerMessage::Starting(names) => format!("STARTING {}\n", json!(names)),
            ServerMessage::State(snapshot) => format!("STATE: {}\n", json!(snapshot)),
            ServerMessage::Prompt => PROMPT.to_string(),
            ServerMessage::Error { kind, message } => format!("ERROR: {kind} {message}\n"),
            ServerMessage::Trash => "TRASH\n".to_string(),
            ServerMessage::Winner(name) => format!("WINNER {name}\n"),
            ServerMessage::Kick => "KICK\n".to_string(),
        }
    }

    /// Parses one received line, trailing newline optional.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        if line == PROMPT { return Ok(ServerMessage::Prompt); }
        let line = line.trim_end_matches(['\r', '\n']);
        let bad = |reason: String| ProtocolError::BadPayload { line: line.to_string(), reason };
        if let Some(rest) = line.strip_prefix("STARTING ") {
            return serde_json::from_str(rest).map(ServerMessage::Starting).map_err(|e| bad(e.to_string()));
        }
        if let Some(rest) = line.strip_prefix("STATE: ") {
            return serde_json::from_str(rest).map(ServerMessage::State).map_err(|e| bad(e.to_string()));
        }
        if let Some(rest) = line.strip_prefix("ERROR: ") {
            let (kind, message) = rest.split_once(' ').unwrap_or((rest, ""));
            return Ok(ServerMessage::Error { kind: kind.to_string(), message: message.to_string() });
        }
        // The colon form is accepted too.
        if let Some(name) = line.strip_prefix("WINNER: ").or_else(|| line.strip_prefix("WINNER ")) {
            return Ok(ServerMessage::Winner(name.to_string()));
        }
        match line {
            "TRASH" => Ok(ServerMessage::Trash),
            "KICK" => Ok(ServerMessage::Kick),
            _ => Err(ProtocolError::UnknownMessage(line.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::selection;

    #[test]
    fn commands_parse_case_insensitively() {
        assert_eq!(ClientCommand::parse("play [0, 2, 2]\n"), Ok(ClientCommand::Play(selection([0, 2]))));
        assert_eq!(ClientCommand::parse("Bank\r\n"), Ok(ClientCommand::Bank));
        assert_eq!(ClientCommand::parse("trash"), Ok(ClientCommand::Trash));
        assert_eq!(ClientCommand::parse("NAME  Lucky Seven \n"), Ok(ClientCommand::Name("Lucky Seven".into())));
        assert_eq!(ClientCommand::parse("NAME"), Ok(ClientCommand::Name(String::new())));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert_eq!(ClientCommand::parse("   \n"), Err(ProtocolError::Empty));
        assert_eq!(ClientCommand::parse("ROLL"), Err(ProtocolError::UnknownCommand("ROLL".into())));
        assert_eq!(ClientCommand::parse("BANK now"), Err(ProtocolError::UnexpectedArgument("BANK")));
        assert!(matches!(ClientCommand::parse("PLAY [-1]"), Err(ProtocolError::BadSelection(_))));
        assert!(matches!(ClientCommand::parse("PLAY 0 1"), Err(ProtocolError::BadSelection(_))));
        assert_eq!(ClientCommand::parse("PLAY []"), Ok(ClientCommand::Play(Selection::new())));
    }

    #[test]
    fn commands_render_for_the_wire() {
        assert_eq!(ClientCommand::Play(selection([3, 1])).to_string(), "PLAY [1,3]");
        assert_eq!(ClientCommand::Name("ada".into()).to_string(), "NAME ada");
    }

    #[test]
    fn state_line_uses_wire_field_names() {
        let snap = TurnSnapshot { total_score: 50, turn_score: 100, played_hands: 1, played_turns: 2, dice: vec![1, 6] };
        let line = ServerMessage::State(snap.clone()).encode();
        assert_eq!(
            line,
            "STATE: {\"dices\":[1,6],\"played_hands\":1,\"played_turns\":2,\"total_score\":50,\"turn_score\":100}\n"
        );
        assert_eq!(ServerMessage::parse(&line), Ok(ServerMessage::State(snap)));
    }

    #[test]
    fn state_with_unknown_field_is_rejected() {
        let line = "STATE: {\"total_score\":0,\"turn_score\":0,\"played_hands\":0,\"played_turns\":0,\"dices\":[1],\"cheat\":true}";
        assert!(matches!(ServerMessage::parse(line), Err(ProtocolError::BadPayload { .. })));
    }

    #[test]
    fn winner_line_has_no_colon_but_both_forms_parse() {
        assert_eq!(ServerMessage::Winner("ada".into()).encode(), "WINNER ada\n");
        assert_eq!(ServerMessage::parse("WINNER: ada\n"), Ok(ServerMessage::Winner("ada".into())));
        assert_eq!(ServerMessage::parse("WINNER ada lovelace"), Ok(ServerMessage::Winner("ada lovelace".into())));
    }

    #[test]
    fn server_lines_parse() {
        assert_eq!(ServerMessage::parse(">> "), Ok(ServerMessage::Prompt));
        assert_eq!(ServerMessage::parse("STARTING [\"a\",\"b\"]\n"), Ok(ServerMessage::Starting(vec!["a".into(), "b".into()])));
        assert_eq!(ServerMessage::parse("WINNER ada\n"), Ok(ServerMessage::Winner("ada".into())));
        assert_eq!(
            ServerMessage::parse("ERROR: InvalidSelection cannot use 2 alone\n"),
            Ok(ServerMessage::Error { kind: "InvalidSelection".into(), message: "cannot use 2 alone".into() })
        );
        assert_eq!(ServerMessage::parse("KICK\n"), Ok(ServerMessage::Kick));
        assert!(ServerMessage::parse("HELLO\n").is_err());
    }
}
