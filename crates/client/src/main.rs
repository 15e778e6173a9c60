//! Terminal client for the grid merge game.
//!
//! Reads one command per line from stdin and prints the board as runtime
//! events arrive. Logs go to a file so they never interleave with the board.

mod command;
mod config;
mod logging;
mod render;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use command::{HELP, PlayerCommand};
use config::ClientConfig;
use runtime::{
    DropReason, Event, FileSaveRepository, InMemoryLeaderboard, MoveResponse, Runtime,
    RuntimeHandle, Topic,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging()?;

    let save_dir = config.save_dir();
    tracing::info!("Save directory: {}", save_dir.display());
    let repository = Arc::new(FileSaveRepository::new(&save_dir)?);

    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .save_repository(repository)
        .leaderboard(Arc::new(InMemoryLeaderboard::new()))
        .build()
        .await?;

    let startup = runtime.startup();
    if let Some(bonus) = startup.welcome_bonus {
        println!("welcome! here are {bonus} coins to start with");
    }
    if startup.load_failed {
        println!("your previous save could not be read; starting over");
    }
    if startup.game_over {
        println!("no moves left on your saved board. undo, destroy or restart");
    }

    let handle = runtime.handle();
    let printer = tokio::spawn(print_events(
        handle.subscribe(Topic::Board),
        handle.subscribe(Topic::Economy),
        handle.subscribe(Topic::Persistence),
    ));

    let view = handle.query_state().await?;
    println!("{}", render::render_board(&view.board));
    println!("{}", render::render_status(&view));
    println!("{HELP}");

    let ad_reward = config.runtime_config().game_config.ad_reward;
    let result = run_input_loop(&handle, ad_reward).await;

    // Last-chance save before exiting.
    if let Err(error) = handle.flush_save().await {
        tracing::warn!(%error, "Final save failed");
    }
    drop(handle);
    runtime.shutdown().await?;
    printer.abort();

    tracing::info!("Client shutdown complete");
    result
}

async fn run_input_loop(handle: &RuntimeHandle, ad_reward: u64) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<PlayerCommand>() {
            Ok(command) => command,
            Err(command::ParseCommandError::Empty) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        if command == PlayerCommand::Quit {
            break;
        }
        if let Err(error) = execute(handle, command, ad_reward).await {
            if error.as_session().is_some() {
                println!("{error}");
            } else {
                return Err(error.into());
            }
        }
    }
    Ok(())
}

async fn execute(
    handle: &RuntimeHandle,
    command: PlayerCommand,
    ad_reward: u64,
) -> runtime::Result<()> {
    match command {
        PlayerCommand::Move(direction) => match handle.move_tiles(direction).await? {
            MoveResponse::Accepted(_) => {}
            MoveResponse::Unchanged => println!("nothing moves {direction}"),
            MoveResponse::Dropped(DropReason::GameOver) => {
                println!("the game is over. undo, destroy or restart")
            }
            MoveResponse::Dropped(reason) => tracing::debug!(%reason, "Input dropped"),
        },
        PlayerCommand::Undo => {
            handle.undo().await?;
        }
        PlayerCommand::Destroy(position) => {
            handle.destroy(position).await?;
        }
        PlayerCommand::Swap(first, second) => {
            handle.swap(first, second).await?;
        }
        PlayerCommand::WatchAd => {
            handle.grant_reward(ad_reward).await?;
        }
        PlayerCommand::Restart => {
            handle.restart().await?;
        }
        PlayerCommand::Pause => handle.set_paused(true).await?,
        PlayerCommand::Resume => handle.set_paused(false).await?,
        PlayerCommand::Save => {
            handle.flush_save().await?;
            println!("saved");
        }
        PlayerCommand::Help => println!("{HELP}"),
        PlayerCommand::Quit => {}
    }

    if !matches!(command, PlayerCommand::Move(_) | PlayerCommand::Help) {
        println!("{}", render::render_status(&handle.query_state().await?));
    }
    Ok(())
}

/// Prints events until the runtime goes away.
async fn print_events(
    mut board_rx: broadcast::Receiver<Event>,
    mut economy_rx: broadcast::Receiver<Event>,
    mut persistence_rx: broadcast::Receiver<Event>,
) {
    loop {
        let received = tokio::select! {
            event = board_rx.recv() => event,
            event = economy_rx.recv() => event,
            event = persistence_rx.recv() => event,
        };

        match received {
            Ok(event) => {
                if let Some(text) = render::render_event(&event) {
                    println!("{text}");
                }
                if let Event::Board(runtime::BoardEvent::MoveSettled { report }) = &event {
                    println!("score {}  coins {}", report.score, report.currency);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event printer lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
