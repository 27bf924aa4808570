pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod scoreboard;
pub mod server;
pub mod session;
pub mod table;
pub mod telemetry;

pub use config::{Args, ServerConfig};
pub use error::{CommandError, ConfigError, TransportError};
pub use scoreboard::{ScoreEvent, Scoreboard, ScoreboardHandle};
pub use server::TableServer;
pub use session::{Session, TurnOutcome};
pub use table::{GameOutcome, Table};
