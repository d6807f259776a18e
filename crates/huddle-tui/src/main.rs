//! huddle terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Start on the landing view with a stored or new session
//! huddle --user Ann
//!
//! # Open a room straight away; asks for a name first if none is stored
//! huddle --room 1a2b3c4d --session-file /tmp/ann.json
//! ```

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use huddle_core::{PersistedSession, initial_snapshot};
use huddle_tui::{App, Bridge, FileStorage, LocalHub, Route, Runtime, SystemEnv, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `--log-filter` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "huddle=info";

/// huddle terminal chat client
#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Terminal client for huddle chat rooms")]
#[command(version)]
struct Args {
    /// Display name. Replaces the user stored in the session file.
    #[arg(short, long)]
    user: Option<String>,

    /// Avatar reference sent along with the name
    #[arg(long, default_value = "")]
    icon: String,

    /// Room hash to open at startup
    #[arg(short, long)]
    room: Option<String>,

    /// Session storage file (user and rooms)
    #[arg(long, default_value = "huddle-session.json")]
    session_file: PathBuf,

    /// Log file. The terminal owns stdout.
    #[arg(long, default_value = "huddle.log")]
    log_file: PathBuf,

    /// Log filter directives, e.g. "huddle=debug"
    #[arg(long)]
    log_filter: Option<String>,

    /// Idle time after the last keystroke before typing stops, in ms
    #[arg(long, default_value_t = 1500)]
    typing_window_ms: u64,

    /// Seed for the in-process hub's room hashes. Random if absent.
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match &args.log_filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    let file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let storage = FileStorage::open(&args.session_file);
    let snapshot = initial_snapshot(Some(&PersistedSession::read(&storage)));
    tracing::info!(
        session = %storage.path().display(),
        rooms = snapshot.rooms().len(),
        "huddle starting"
    );

    let hub = LocalHub::new(args.seed.unwrap_or_else(rand::random));
    let lobby = hub.open_room("lobby");

    let route = args.room.map_or(Route::Landing, Route::Room);
    let mut app = App::new(snapshot, route);
    let startup = match &args.user {
        Some(name) => app.set_user(name, &args.icon),
        None => Vec::new(),
    };
    app.set_status(format!("Lobby: /join {lobby}"));

    let window = Duration::from_millis(args.typing_window_ms);
    let bridge = Bridge::with_typing_window(SystemEnv::new(), window);
    let driver = TerminalDriver::new(hub, storage)?;

    let mut runtime = Runtime::new(driver, app, bridge).with_startup_actions(startup);
    runtime.run().await?;
    tracing::info!("huddle stopped");
    Ok(())
}
