use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use farkle_engine::DEFAULT_GOAL;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dice table server for 5000", long_about = None)]
pub struct Args {
    /// JSON file with base settings; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Interface to bind (default: 127.0.0.1).
    #[arg(long)]
    pub bind_ip: Option<IpAddr>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Players seated per table.
    #[arg(short = 'n', long)]
    pub seats: Option<usize>,

    /// Seconds a player may take to answer a prompt.
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Banked score that wins the game.
    #[arg(long)]
    pub goal: Option<u32>,

    /// Seed for seating and dice (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the scoreboard.
    #[arg(long, default_value_t = false)]
    pub no_scoreboard: bool,

    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_ip: IpAddr,
    pub port: u16,
    #[serde(alias = "n_players")]
    pub seats: usize,
    /// Seconds; `None` waits forever.
    pub timeout: Option<f64>,
    pub goal: u32,
    pub seed: Option<u64>,
    pub scoreboard: bool,
    pub scoreboard_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8998,
            seats: 1,
            timeout: None,
            goal: DEFAULT_GOAL,
            seed: None,
            scoreboard: true,
            scoreboard_title: "5000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: shown.clone(), source })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: shown, source })
    }

    /// File settings (or defaults) overridden by any flag given.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(ip) = args.bind_ip { config.bind_ip = ip; }
        if let Some(port) = args.port { config.port = port; }
        if let Some(seats) = args.seats { config.seats = seats; }
        if args.timeout.is_some() { config.timeout = args.timeout; }
        if let Some(goal) = args.goal { config.goal = goal; }
        if args.seed.is_some() { config.seed = args.seed; }
        if args.no_scoreboard { config.scoreboard = false; }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats == 0 {
            return Err(ConfigError::Invalid("seats must be at least 1".into()));
        }
        if self.goal == 0 {
            return Err(ConfigError::Invalid("goal must be positive".into()));
        }
        if let Some(secs) = self.timeout {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ConfigError::Invalid(format!("timeout must be a positive number of seconds, got {secs}")));
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr { SocketAddr::new(self.bind_ip, self.port) }

    pub fn io_timeout(&self) -> Option<Duration> { self.timeout.map(Duration::from_secs_f64) }
}
