//! Watch command implementation

use crate::cli::{
    apply_color_choice, build_dashboard, configured_services, discover_services, draw_dashboard,
    load_config_with_overrides, WatchArgs,
};
use crate::board::{TerminalBoard, TerminalCharts};
use crate::config::StatusWatchConfig;
use crate::dashboard::Dashboard;
use crate::logging::init_tracing;
use crate::poller::{Poller, StatusClient, StatusSource};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Resolve watch settings: file, environment, then flags.
pub fn load_watch_config(args: &WatchArgs) -> Result<StatusWatchConfig, Box<dyn std::error::Error>> {
    let mut config = load_config_with_overrides(&args.source)?;
    if let Some(interval) = args.interval {
        config.client.interval_seconds = interval;
    }
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

fn redraw(frame: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}{}", CLEAR_SCREEN, frame).and_then(|_| stdout.flush()) {
        tracing::warn!(error = %e, "Failed to draw board");
    }
}

/// Ask `source` for the service list until it answers.
///
/// Until then an empty board is shown through `on_update`, marked
/// "Update Error" after each failed attempt. Returns the laid-out dashboard
/// with the first report applied, or `None` if cancelled first.
pub async fn discover_dashboard<Src, F>(
    source: &Src,
    config: &StatusWatchConfig,
    color: bool,
    retry_interval: Duration,
    cancel_token: &CancellationToken,
    mut on_update: F,
) -> Option<Dashboard<TerminalBoard, TerminalCharts>>
where
    Src: StatusSource,
    F: FnMut(&Dashboard<TerminalBoard, TerminalCharts>),
{
    let mut waiting = build_dashboard(Vec::new(), config, color);
    on_update(&waiting);

    let mut interval = tokio::time::interval(retry_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => return None,
            _ = interval.tick() => {}
        }
        let result = tokio::select! {
            _ = cancel_token.cancelled() => return None,
            result = source.fetch() => result,
        };
        match result {
            Ok(report) => {
                let services = discover_services(&report);
                tracing::info!(services = services.len(), "Discovered services from endpoint");
                let mut dashboard = build_dashboard(services, config, color);
                dashboard.apply(Ok(report));
                return Some(dashboard);
            }
            Err(error) => {
                tracing::warn!("Service discovery failed, retrying");
                waiting.apply(Err(error));
                on_update(&waiting);
            }
        }
    }
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_watch_config(&args)?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    apply_color_choice(&args.source);

    tracing::info!(endpoint = %config.client.endpoint, "Starting statuswatch");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Lay out the board, asking the endpoint when no services are configured
    let client = Arc::new(StatusClient::new(config.client.clone())?);
    let interval = Duration::from_secs(config.client.interval_seconds);
    let color = !args.source.no_color;
    let services = configured_services(&config)?;

    let cancel_token = CancellationToken::new();
    let signal_handle = tokio::spawn(shutdown_signal(cancel_token.clone()));

    let dashboard = if services.is_empty() {
        discover_dashboard(
            &*client,
            &config,
            color,
            interval,
            &cancel_token,
            |d| redraw(&draw_dashboard(d)),
        )
        .await
    } else {
        Some(build_dashboard(services, &config, color))
    };

    // 4. Poll until interrupted
    if let Some(mut dashboard) = dashboard {
        redraw(&draw_dashboard(&dashboard));
        let mut poller = Poller::from_arc(client, interval);
        poller
            .run(&mut dashboard, cancel_token, |d| redraw(&draw_dashboard(d)))
            .await;

        let (_board, charts) = dashboard.into_renderer().into_parts();
        tracing::debug!(live_charts = charts.live_count(), "Released charts");
    }

    // 5. Cleanup
    signal_handle.abort();
    tracing::info!("statuswatch stopped");
    Ok(())
}
