use anyhow::Context;
use clap::{Parser, ValueEnum};
use farkle_engine::BotLevel;
use farkle_server::{client, telemetry};
use tokio::net::TcpStream;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Level {
    Amateur,
    Pro,
}

impl From<Level> for BotLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Amateur => BotLevel::Amateur,
            Level::Pro => BotLevel::Pro,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Bot player for the 5000 dice server", long_about = None)]
struct Args {
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(short, long, default_value_t = 8998)]
    port: u16,

    /// Name announced to the table.
    #[arg(long, default_value = "Demo")]
    name: String,

    #[arg(long, value_enum, default_value_t = Level::Amateur)]
    level: Level,

    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    let stream = TcpStream::connect((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to connect to {}:{}", args.host, args.port))?;
    info!(host = %args.host, port = args.port, "connected");

    let report = client::play(stream, &args.name, args.level.into()).await?;
    info!(
        winner = report.winner.as_deref().unwrap_or("-"),
        total = ?report.last_state.as_ref().map(|s| s.total_score),
        commands = report.commands_sent,
        "game over"
    );
    Ok(())
}
