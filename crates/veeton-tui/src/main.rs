//! Veeton terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Landing view against the default backend
//! veeton
//!
//! # Open a room directly, logging to a file
//! veeton --open /chat/3f2b8c1e-5a4d-4e6f-9b7a-0c1d2e3f4a5b --log-file veeton.log
//! ```

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use veeton_app::{ChatTimings, Route, Runtime};
use veeton_client::{DEFAULT_BASE_URL, HttpApi, HttpApiConfig};
use veeton_tui::{FileIdentityStore, TerminalDriver};

/// Veeton terminal chat client
#[derive(Parser, Debug)]
#[command(name = "veeton")]
#[command(about = "Terminal client for ephemeral Veeton chat rooms")]
#[command(version)]
struct Args {
    /// Chat API root
    #[arg(long, env = "VEETON_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Per-request timeout in seconds (0 waits indefinitely)
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// File the display name is remembered in
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Route to open on start, `/` or `/chat/{roomId}`
    #[arg(long, default_value = "/")]
    open: Route,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn api_config(&self) -> HttpApiConfig {
        HttpApiConfig {
            base_url: self.api_url.clone(),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.session_file.clone().or_else(FileIdentityStore::default_path)
    }
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    tracing::info!("Veeton client starting");
    tracing::info!(api = %args.api_url, "using backend");

    let api = HttpApi::new(&args.api_config())?;
    let Some(session_path) = args.session_path() else {
        return Err("no config directory; pass --session-file".into());
    };
    let store = FileIdentityStore::new(session_path);

    let driver = TerminalDriver::new()?;
    Runtime::new(driver, api, store, ChatTimings::default()).run(args.open).await?;

    tracing::info!("Veeton client stopped");
    Ok(())
}
