use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use presence_bridge::discord::DiscordSdk;
use presence_bridge::settings::{default_settings_path, load_settings};
use presence_bridge::{logging, ConnectionEvent, PresenceSession};

/// Publish a Discord rich presence until interrupted
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured application id
    #[arg(long)]
    application_id: Option<String>,

    /// Override the primary status line
    #[arg(long)]
    details: Option<String>,

    /// Override the secondary status line
    #[arg(long)]
    state: Option<String>,
}

fn run(args: Args) -> Result<(), String> {
    let path = match args.config {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let mut settings = load_settings(&path)?;

    if let Some(id) = args.application_id {
        settings.application_id = id;
    }
    if let Some(details) = args.details {
        settings.activity.details = Some(details);
    }
    if let Some(state) = args.state {
        settings.activity.state = Some(state);
    }

    let sdk = DiscordSdk::new()
        .map_err(|e| format!("Failed to start Discord runtime: {}", e))?
        .with_event_handler(|event| match event {
            ConnectionEvent::Connected { username } => {
                tracing::info!("Discord connected as {}", username)
            }
            ConnectionEvent::Disconnected { reason } => {
                tracing::warn!("Discord disconnected: {}", reason)
            }
        });

    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = Arc::clone(&stop);
    sdk.runtime_handle().spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_signal.store(true, Ordering::SeqCst);
        }
    });

    let mut presence = PresenceSession::new(sdk);
    presence.initialize(&settings.application_id)?;
    presence.update_presence(&settings.activity)?;

    let interval = settings.pump_interval();
    tracing::info!("Presence published, pumping callbacks every {:?}", interval);

    while !stop.load(Ordering::SeqCst) {
        presence.pump_callbacks();
        std::thread::sleep(interval);
    }

    presence.shutdown();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = logging::init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
