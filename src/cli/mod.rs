use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, level_filters::LevelFilter};

use crate::{
    store::{record_store::RecordStore, slot_storage::FileSlotStorage},
    tags::{EmojiTag, SelectionState},
    ticker::{Ticker, TICK_INTERVAL},
    utils::{
        clock::{Clock, DefaultClock},
        dir::create_application_default_path,
        logging::enable_logging,
    },
    view::{self, WatchSession},
};

#[derive(Parser, Debug)]
#[command(name = "Checktick", version, long_about = None)]
#[command(about = "Terminal clock for recording emoji-tagged check-ins", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show the live clock and take check-in commands interactively")]
    Watch {},
    #[command(about = "Record a check-in at the current moment")]
    Record {
        #[arg(long, value_enum, help = "Tag for the new check-in")]
        tag: Option<EmojiTag>,
    },
    #[command(about = "Print the recorded check-ins with their elapsed times")]
    List {},
    #[command(about = "Replace the tag of an already recorded check-in")]
    Tag {
        #[arg(help = "Position in the list, 0 is the newest")]
        index: usize,
        #[arg(value_enum)]
        tag: EmojiTag,
    },
    #[command(about = "Remove all recorded check-ins")]
    Clear {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match args.dir {
        Some(v) => v,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&dir, logging_level, args.log)?;

    let storage = FileSlotStorage::new(dir.join("state"))?;
    let mut store = RecordStore::load(storage, Box::new(DefaultClock));

    match args.commands {
        Commands::Watch {} => run_watch(store).await,
        Commands::Record { tag } => {
            let tag = tag.unwrap_or_else(|| SelectionState::default().current());
            store.insert(tag);
            print!("{}", view::render_table(DefaultClock.time(), store.records()));
            Ok(())
        }
        Commands::List {} => {
            print!("{}", view::render_table(DefaultClock.time(), store.records()));
            Ok(())
        }
        Commands::Tag { index, tag } => {
            store.retag(index, tag);
            print!("{}", view::render_table(DefaultClock.time(), store.records()));
            Ok(())
        }
        Commands::Clear { yes } => {
            let confirmed = yes || {
                println!("Remove all recorded check-ins? [y/N]");
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                view::is_confirmation(&answer)
            };
            if confirmed {
                store.clear();
            }
            Ok(())
        }
    }
}

/// Runs the widget: one ticker, one session, one shutdown token tying them
/// together. The ticker is created on entry and cancelled on exit, never
/// duplicated.
async fn run_watch(store: RecordStore<FileSlotStorage>) -> Result<()> {
    let shutdown = CancellationToken::new();
    let (ticker, ticks) = Ticker::new(shutdown.clone(), TICK_INTERVAL, Box::new(DefaultClock));
    let session = WatchSession::new(store, ticks, shutdown.clone());

    let (_, ticker_result, session_result) = tokio::join!(
        detect_shutdown(shutdown.clone()),
        ticker.run(),
        async {
            let result = session.run().await;
            // Session is over either way, take the ticker down with it.
            shutdown.cancel();
            result
        },
    );

    if let Err(ticker_result) = ticker_result {
        error!("Ticker got an error {:?}", ticker_result);
    }

    if let Err(session_result) = session_result {
        error!("Watch session got an error {:?}", session_result);
    }

    Ok(())
}

/// Detects ctrl-c and folds it into the shared cancellation token.
async fn detect_shutdown(cancellation: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => {}
    };
}
