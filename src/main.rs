//! Log Console - per-source output logs with an unread attention indicator
//!
//! Usage:
//!   log-console                       Listen for host events and render the indicator
//!   log-console --port 9500 -v        Override the feed port, debug output
//!   log-console init-config [PATH]    Write a default config file

use clap::Parser;
use log_console::cli::{Cli, Command};
use log_console::config::{self, Config};
use log_console::console::{self, Console};
use log_console::error::{ConsoleError, Result};
use log_console::logging::{self, receiver, LogRegistry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(Command::InitConfig { path }) = &cli.command {
        logging::init_tracing("info", cli.verbose);
        let path = match path {
            Some(p) => p.clone(),
            None => config::default_path()?,
        };
        config::save(&Config::default(), &path)?;
        info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let mut cfg = config::load(cli.config.as_deref());
    logging::init_tracing(&cfg.logging.level, cli.verbose);

    if let Some(port) = cli.port {
        cfg.feed.port = port;
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        cfg.highlight.debounce_ms = debounce_ms;
    }
    cfg.validate()?;

    // The core is single-threaded; one event loop drives it
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| ConsoleError::Runtime { source })?;

    rt.block_on(serve(cfg))
}

async fn serve(cfg: Config) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let events = receiver::spawn_feed_receiver(shutdown.clone(), cfg.feed.port)?;

    let registry = Arc::new(LogRegistry::new());
    let console = Console::new(registry, cfg.highlight.settings());

    // Status indicator renderer
    let _renderer = console.presentation_changed().connect(|presentation| {
        info!("{}", presentation);
    });

    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown_clone.store(true, Ordering::SeqCst);
    });

    info!("Listening for host events on 127.0.0.1:{}", cfg.feed.port);
    console::run(console, events).await;
    Ok(())
}
