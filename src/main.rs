use color_eyre::eyre::Result;
use tracing::info;

use tris::arena;
use tris::config::MatchConfig;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = match std::env::args_os().nth(1) {
        Some(path) => MatchConfig::from_path(path.as_ref())?,
        None => MatchConfig::default(),
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_thread_ids(true))
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target(
                    "tris",
                    if config.verbose {
                        tracing::Level::DEBUG
                    } else {
                        tracing::Level::INFO
                    },
                )
                .with_default(tracing::Level::INFO),
        )
        .try_init()?;

    info!("games" = config.games, "mode" = ?config.mode, "seed" = config.seed, "match_started");
    let tally = arena::run(&config)?;
    info!(
        "x_wins" = tally.x_wins,
        "o_wins" = tally.o_wins,
        "draws" = tally.draws,
        "match_finished"
    );

    println!("{}", serde_json::to_string_pretty(&tally)?);
    Ok(())
}
