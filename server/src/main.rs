use anyhow::Context;
use clap::Parser;
use farkle_server::scoreboard::DEFAULT_QUEUE;
use farkle_server::{telemetry, Args, Scoreboard, ServerConfig, TableServer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    let config = ServerConfig::load(&args).context("invalid configuration")?;
    info!(?config, "configuration loaded");

    let scoreboard = if config.scoreboard {
        let board = Scoreboard::new(config.scoreboard_title.clone());
        let mut feed = board.subscribe();
        tokio::spawn(async move {
            while let Ok(standings) = feed.recv().await {
                info!(title = %standings.title, scores = ?standings.scores, "standings");
            }
        });
        let (handle, _task) = board.spawn(DEFAULT_QUEUE);
        Some(handle)
    } else {
        None
    };

    TableServer::bind(config, scoreboard).await?.run().await
}
