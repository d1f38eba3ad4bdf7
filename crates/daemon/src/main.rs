// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folder-Model Daemon (fmdmd)
//!
//! Background process that owns the shared embedding-model store, every
//! folder's lifecycle state machine, and the WebSocket fan-out of the
//! Folder-Model Data Model to connected clients (tui/cli/web).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fmdm_config::{Configuration, TomlFileConfiguration};
use fmdm_daemon::orchestrator::{Orchestrator, OrchestratorConfig};
use fmdm_daemon::registry::Registry;
use fmdm_daemon::{env as daemon_env, registry};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "fmdmd", about = "Folder-Model Daemon")]
struct Cli {
    /// WebSocket port (spec.md §6 default 31850). No separate HTTP channel
    /// is exposed, so this names the bind port directly (DESIGN.md).
    #[arg(long, default_value_t = daemon_env::DEFAULT_PORT)]
    port: u16,

    /// Bind address.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Stop any currently registered daemon first, then start fresh.
    #[arg(long, short = 'r')]
    restart: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_guard = setup_logging();
    info!(port = cli.port, host = %cli.host, "starting fmdmd");

    if let Err(err) = run(cli).await {
        error!(%err, "fatal startup failure");
        drop(log_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry_path = Registry::default_path();

    if cli.restart {
        stop_existing_daemon(&registry_path).await;
    }

    let configuration: Arc<dyn Configuration> = Arc::new(TomlFileConfiguration::at_default_path()?);

    let (max_updates_per_second, debounce) = daemon_env::throttler_tuning();
    let ws_port = daemon_env::port_override().unwrap_or(cli.port);

    let config = OrchestratorConfig {
        host: cli.host,
        port: ws_port,
        daemon_version: env!("CARGO_PKG_VERSION").to_string(),
        registry_path,
        max_updates_per_second,
        debounce,
    };

    let mut orchestrator = Orchestrator::bootstrap(config, configuration, fmdm_backends::default_models())?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // `run_fut` borrows `orchestrator` mutably; it is dropped at the end of
    // this block (select! cancels whichever branch did not win), releasing
    // the borrow so `stop()` below can run on every exit path exactly once.
    let result = {
        let mut run_fut = Box::pin(orchestrator.run());
        tokio::select! {
            result = &mut run_fut => Some(result),
            _ = sigterm.recv() => { info!("received SIGTERM, shutting down"); None }
            _ = sigint.recv() => { info!("received SIGINT, shutting down"); None }
        }
    };

    orchestrator.stop();

    match result {
        Some(result) => result.map_err(|e| e.into()),
        None => Ok(()),
    }
}

/// spec.md §4.A restart semantics: signal the previous pid (graceful first,
/// forced after a bounded timeout), poll for exit, then clean the stale
/// registry entry so the fresh `register()` below does not race it.
async fn stop_existing_daemon(registry_path: &std::path::Path) {
    let Some(existing) = registry::Registry::discover(registry_path) else {
        return;
    };
    let pid = Pid::from_raw(existing.pid as i32);

    info!(pid = existing.pid, "restart requested, stopping the running daemon");
    if kill(pid, Signal::SIGTERM).is_err() {
        warn!(pid = existing.pid, "SIGTERM failed, pid may already be gone");
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if kill(pid, None).is_err() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    if kill(pid, None).is_ok() {
        warn!(pid = existing.pid, "daemon did not exit gracefully, sending SIGKILL");
        let _ = kill(pid, Signal::SIGKILL);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    let _ = std::fs::remove_file(registry_path);
}

fn setup_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("fmdmd.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    guard
}

fn log_file_path() -> PathBuf {
    let dir = dirs::state_dir().or_else(dirs::data_local_dir).unwrap_or_else(std::env::temp_dir);
    dir.join("fmdmd").join("fmdmd.log")
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

