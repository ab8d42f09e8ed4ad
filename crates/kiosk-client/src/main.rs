//! Kiosk Session Client entry point.
//!
//! Loads the settings file, applies the startup gate, wires the session
//! client to its real collaborators, and runs the event loop until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ TomlConfigStore::open()   -- settings file
//!  └─ startup::evaluate()       -- onlyRunFor / onlyStopFor gate
//!  └─ SessionClient::new()      -- HttpTransport, SystemOsActions,
//!  │                               UdpWakeSender, TokioScheduler,
//!  │                               ChannelEventSink
//!  └─ spawn_event_printer()     -- UI events → JSON lines on stdout
//!  └─ spawn_console()           -- stdin commands → client
//!  └─ SessionClient::run()      -- single-consumer event loop
//! ```
//!
//! # Flags
//!
//! - `--config <path>` (`KIOSK_CLIENT_CONFIG`): settings file; defaults to
//!   the platform config directory.
//! - `--log-level <filter>` (`KIOSK_CLIENT_LOG`): used when `RUST_LOG` is
//!   not set.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kiosk_client::application::ports::{OsAction, OsActions};
use kiosk_client::application::session_client::{ClientDeps, SessionClient};
use kiosk_client::application::settings::ClientSettings;
use kiosk_client::application::startup::{self, StartupDecision};
use kiosk_client::infrastructure::network::{HttpTransport, UdpWakeSender};
use kiosk_client::infrastructure::node_info;
use kiosk_client::infrastructure::os_actions::SystemOsActions;
use kiosk_client::infrastructure::scheduler::TokioScheduler;
use kiosk_client::infrastructure::storage::TomlConfigStore;
use kiosk_client::infrastructure::ui_bridge::console::spawn_console;
use kiosk_client::infrastructure::ui_bridge::{spawn_event_printer, ChannelEventSink};

#[derive(Debug, Parser)]
#[command(name = "kiosk-client", version, about = "Kiosk session client")]
struct Args {
    /// Settings file (TOML).
    #[arg(long, env = "KIOSK_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "KIOSK_CLIENT_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&args.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Settings ──────────────────────────────────────────────────────────────
    let store = match &args.config {
        Some(path) => TomlConfigStore::open(path),
        None => TomlConfigStore::open_default(),
    }
    .context("loading settings")?;
    info!(path = %store.path().display(), "settings loaded");
    let store = Arc::new(store);

    let settings = ClientSettings::load(store.as_ref()).context("reading settings")?;
    let os = Arc::new(SystemOsActions::new());

    // ── Startup gate ──────────────────────────────────────────────────────────
    let os_user = node_info::current_os_user();
    if let StartupDecision::Exit {
        reason,
        start_shell,
    } = startup::evaluate(&settings, &os_user)
    {
        info!(%os_user, reason, "kiosk client not started for this user");
        if let Some(shell) = start_shell {
            if let Err(e) = os.perform(&OsAction::StartShell(shell)) {
                warn!("could not start user shell: {e}");
            }
        }
        std::process::exit(1);
    }

    if let Err(e) = os.perform(&OsAction::DesktopStartup) {
        warn!("desktop lockdown failed: {e}");
    }
    if let Err(e) = startup::reset_session_keys(store.as_ref()) {
        warn!("could not reset session settings: {e}");
    }

    // ── Wiring ────────────────────────────────────────────────────────────────
    let transport =
        HttpTransport::new(&settings.server.base_url()).context("creating HTTP client")?;
    let identity = node_info::build_identity(&settings);

    let (tx, rx) = mpsc::unbounded_channel();
    let (sink, ui_rx) = ChannelEventSink::new();

    let deps = ClientDeps {
        transport: Arc::new(transport),
        config: store,
        os,
        wol: Arc::new(UdpWakeSender::new()),
        events: Arc::new(sink),
        scheduler: Arc::new(TokioScheduler::new(tx.clone())),
    };

    spawn_event_printer(ui_rx);
    spawn_console(tx.clone());

    let mut client = SessionClient::new(
        identity,
        env!("CARGO_PKG_VERSION"),
        settings.logout_action,
        deps,
        tx,
    );
    client.start();
    info!(server = %settings.server.base_url(), "kiosk client ready");

    // ── Event loop ────────────────────────────────────────────────────────────
    tokio::select! {
        _ = client.run(rx) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("could not listen for Ctrl-C: {e}");
            }
            info!("shutdown signal received");
        }
    }

    info!("kiosk client stopped");
    Ok(())
}
