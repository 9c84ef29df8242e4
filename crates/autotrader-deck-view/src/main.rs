/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: A running dashboard session, printed snapshot summaries, optional export file
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, Utc};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use autotrader_deck_adapter::{Credentials, DeckBackend, DeckClient, HistoryWindow, PushChannel};
use autotrader_deck_view::{
    DashboardSession, DashboardState, DeckConfig, PushFeed, export_file_name, export_trades,
};

#[derive(Parser, Debug)]
#[command(name = "autotrader-deck", version, about = "Headless dashboard for the options autotrader")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Also write daily-rotated logs under the user data directory
    #[arg(long = "log-file")]
    log_file: bool,
    /// Equity-curve window in days: 7, 30 or 90
    #[arg(long = "window", value_name = "DAYS")]
    window: Option<u32>,
    /// Run one pull batch, print the summary and exit
    #[arg(long = "once")]
    once: bool,
    /// Write the trade export after the first batch lands
    #[arg(long = "export")]
    export: bool,
    /// Pull only; do not open the push channel
    #[arg(long = "no-push")]
    no_push: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_level, args.log_file)?;

    let mut config = load_config(args.config_path.as_deref())?;
    if let Some(days) = args.window {
        config.fetch.history_window = HistoryWindow::try_from(days)
            .map_err(|err| anyhow!(err))
            .context("invalid --window")?;
    }
    info!(
        base_url = %config.api.base_url,
        window = %config.fetch.history_window,
        once = args.once,
        push = !args.no_push,
        "starting autotrader-deck"
    );

    let backend = build_backend(&config)?;
    let mut session = DashboardSession::new(backend, &config);

    if args.once {
        session.refresh();
        let reports = session.settle().await;
        let stale: usize = reports.iter().map(|report| report.unavailable.len()).sum();
        session.tick(&Local::now());
        info!(batches = reports.len(), stale, "single pass complete");
        println!("{}", session.state().summary());
        if args.export {
            let path = write_export(session.state(), &config)?;
            println!("export written to {}", path.display());
        }
        return Ok(());
    }

    let shutdown = session.shutdown_token();
    setup_signal_handlers(shutdown.clone());

    let mut push_channel = PushChannel::new();
    let push = if args.no_push {
        None
    } else {
        Some(open_push(&mut push_channel, &config.api.ws_url).await?)
    };

    spawn_reporter(&session, &config, args.export, shutdown.clone());

    session.run(push).await;
    push_channel.close().await;
    info!("dashboard session shutdown complete");

    Ok(())
}

fn init_tracing(log_level: &str, log_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let (file_layer, guard) = if log_file {
        let log_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join("autotrader-deck")
            .join("logs");
        std::fs::create_dir_all(&log_dir).context("create log directory")?;
        let appender = tracing_appender::rolling::daily(log_dir, "autotrader-deck.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn load_config(path: Option<&Path>) -> Result<DeckConfig> {
    let Some(path) = path else {
        return Ok(DeckConfig::default());
    };
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    DeckConfig::from_file(path_str).context("load config")
}

fn build_backend(config: &DeckConfig) -> Result<Arc<dyn DeckBackend>> {
    let mut client = DeckClient::with_config(config.api.client_config(), &config.api.base_url)
        .context("build backend client")?;
    if let Some(token) = config.api.token.clone() {
        client.set_credentials(Credentials { api_token: token });
    }
    Ok(Arc::new(client))
}

/// Connect the push channel. A failed connect leaves the session pull-only.
async fn open_push(channel: &mut PushChannel, url: &str) -> Result<PushFeed> {
    let messages = channel
        .take_receiver()
        .ok_or_else(|| anyhow!("push channel receiver already taken"))?;
    let connection = channel.subscribe_connection_state();
    if let Err(err) = channel.connect(url).await {
        warn!(url, error = %err, "push channel unavailable, continuing with pulls only");
    }
    Ok(PushFeed {
        messages,
        connection,
    })
}

/// Print a summary whenever a main batch lands; export once after the first
fn spawn_reporter(
    session: &DashboardSession,
    config: &DeckConfig,
    export: bool,
    shutdown: CancellationToken,
) {
    let mut snapshots = session.handle().subscribe();
    let config = config.clone();
    tokio::spawn(async move {
        let mut last_reported: Option<DateTime<Utc>> = None;
        let mut exported = !export;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }

            let snapshot = snapshots.borrow_and_update().clone();
            if snapshot.last_batch_at.is_none() || snapshot.last_batch_at == last_reported {
                continue;
            }
            last_reported = snapshot.last_batch_at;
            println!("{}\n", snapshot.summary());

            if !exported {
                exported = true;
                match write_export(&snapshot, &config) {
                    Ok(path) => info!(path = %path.display(), "export written"),
                    Err(err) => warn!(error = %err, "export failed"),
                }
            }
        }
    });
}

fn write_export(state: &DashboardState, config: &DeckConfig) -> Result<PathBuf> {
    let bytes = export_trades(
        state.positions.get(),
        state.activity_log.get(),
        config.metrics.contract_multiplier,
    )
    .context("serialize export")?;
    let path = config
        .export
        .directory
        .join(export_file_name(Local::now().date_naive()));
    std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
