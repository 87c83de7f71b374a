// Standard library imports
use std::path::Path;
use std::sync::Arc;

// External crate imports
use anyhow::Result;
use dotenv::dotenv;
use log::{error, info, warn};
use tokio::select;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{sleep, Duration};

// Internal crate imports
use dydx_book_client::config_loader::AppConfig;
use dydx_book_client::domain::model::orderbook::OrderBook;
use dydx_book_client::infrastructure::exchange::dydx::client::DydxClient;
use dydx_book_client::watcher::BookWatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    dotenv().ok();
    // Use an explicit Builder that doesn't check environment variables
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .init();
    info!("Logger initialized");

    // Probe the usual config locations; only a missing file falls back to
    // the built-in defaults. A file that exists but does not parse is fatal
    // rather than silently running with a configuration the user never set.
    let config =
        AppConfig::load_or_default(&[Path::new("./config.toml"), Path::new("../config.toml")])?;

    let config = Arc::new(config);
    info!(
        "Configuration loaded, market: {}, uncross: {}",
        config.feed.market, config.book.uncross
    );

    run_watcher(config).await
}

/// Session supervisor: connect, watch, reconnect until interrupted.
async fn run_watcher(config: Arc<AppConfig>) -> Result<()> {
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    loop {
        info!("Starting order book session for {}", config.feed.market);

        let mut raw_client = DydxClient::new();
        if let Err(e) = raw_client.connect(&config.ws_url()).await {
            error!("Failed to connect: {:?}", e);
            select! {
                _ = sleep(Duration::from_secs(1)) => {
                    warn!("Reconnecting...");
                    continue;
                }
                _ = sigint.recv() => {
                    info!("Exiting program");
                    break;
                }
            }
        }

        // Create a broadcast channel for shutdown signaling
        let (shutdown_tx, _) = broadcast::channel::<()>(2);
        let shared_client = Arc::new(Mutex::new(raw_client));

        // Each session gets a fresh book; levels never survive a reconnect.
        let book = Arc::new(Mutex::new(OrderBook::new(config.book.uncross)));

        let watcher = Arc::new(BookWatcher::new(
            shared_client.clone(),
            book,
            config.feed.market.clone(),
        ));

        let should_exit = run_tasks(watcher, shutdown_tx, &mut sigint).await?;

        info!("Running cleanup...");
        cleanup(shared_client).await;

        if should_exit {
            info!("Exiting program");
            break;
        }

        sleep(Duration::from_secs(1)).await;
        warn!("Reconnecting...");
    }

    Ok(())
}

/// Run the session tasks and wait for the first of: task exit, SIGINT.
async fn run_tasks(
    watcher: Arc<BookWatcher>,
    shutdown_tx: broadcast::Sender<()>,
    sigint: &mut tokio::signal::unix::Signal,
) -> Result<bool> {
    let mut listen_handle = tokio::spawn({
        let watcher = watcher.clone();
        let shutdown_rx = shutdown_tx.subscribe();
        async move {
            if let Err(e) = watcher.listen_task(shutdown_rx).await {
                error!("Listen task failed: {:?}", e);
                return Err(e);
            }
            Ok(())
        }
    });

    let mut ping_handle = tokio::spawn({
        let watcher = watcher.clone();
        let shutdown_rx = shutdown_tx.subscribe();
        async move {
            if let Err(e) = watcher.ping_task(shutdown_rx).await {
                error!("Ping task failed: {:?}", e);
                return Err(e);
            }
            Ok(())
        }
    });

    // Flag to track if we should break out of the session loop (after Ctrl+C)
    let mut should_exit = false;

    select! {
        res = &mut listen_handle => {
            match res {
                Ok(Ok(_)) => info!("Listen task completed successfully"),
                Ok(Err(e)) => error!("Listen task returned error: {:?}", e),
                Err(e) => error!("Listen task panicked: {:?}", e),
            }
        }
        res = &mut ping_handle => {
            match res {
                Ok(Ok(_)) => info!("Ping task completed successfully"),
                Ok(Err(e)) => error!("Ping task returned error: {:?}", e),
                Err(e) => error!("Ping task panicked: {:?}", e),
            }
        }
        _ = sigint.recv() => {
            warn!("SIGINT (Ctrl+C) received. Attempting graceful shutdown...");
            should_exit = true;
        }
    }

    // Signal all tasks to shut down
    if let Err(e) = shutdown_tx.send(()) {
        error!("Failed to send shutdown signal: {}", e);
    } else {
        info!("Shutdown signal sent to all tasks");
    }

    // Give tasks a moment to process the shutdown signal
    sleep(Duration::from_millis(100)).await;

    // Abort the tasks if they're still running
    for (name, handle) in [("listen", &mut listen_handle), ("ping", &mut ping_handle)] {
        if !handle.is_finished() {
            info!("Aborting {} task", name);
            handle.abort();
        }
    }

    Ok(should_exit)
}

async fn cleanup(shared_client: Arc<Mutex<DydxClient>>) {
    let cleanup_future = async {
        let lock_result =
            tokio::time::timeout(Duration::from_secs(2), shared_client.lock()).await;

        let mut client = match lock_result {
            Ok(guard) => guard,
            Err(_) => {
                error!("Timeout while waiting for client lock in cleanup");
                return;
            }
        };

        if client.connected() {
            info!("Attempting to disconnect client...");
            match tokio::time::timeout(Duration::from_secs(3), client.disconnect()).await {
                Ok(Ok(_)) => info!("Client disconnected successfully."),
                Ok(Err(e)) => error!("Failed to disconnect client: {}", e),
                Err(_) => error!("Timeout during client disconnection"),
            }
        } else {
            info!("Client is not connected, skipping disconnect.");
        }
    };

    match tokio::time::timeout(Duration::from_secs(10), cleanup_future).await {
        Ok(_) => info!("Cleanup completed"),
        Err(_) => error!("Cleanup timed out after 10 seconds"),
    }
}
