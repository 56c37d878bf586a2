use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crossbeam_channel::{bounded, select, Receiver};
use j2vclient::{init_logging, AppEvent, PollingLoop, VidfeedApp};
use j2vconfig::get_config;
use j2vfeed::VidfeedConfigExt;
use j2vplayer::{HeadlessEngineFactory, PlayerConfigExt, PlayerEvent};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = get_config();
    init_logging(&config)?;

    info!("🎥 Starting jpeg2video client...");
    if let Some(dir) = config.config_dir() {
        info!(dir = %dir.display(), "Configuration loaded");
    }

    let client = config.build_vidfeed_client()?;
    let interval = config.get_vidfeed_poll_interval()?;
    info!(
        listing = %client.listing_url()?,
        interval_ms = interval.as_millis() as u64,
        "📡 Stream listing source ready"
    );

    let factory = HeadlessEngineFactory::with_simulation(config.get_player_simulate()?);
    let app = VidfeedApp::from_config(&config, factory)?;
    let (stop_view, view_stopped) = bounded::<()>(0);
    let view = spawn_view(
        app.subscribe(),
        app.player().subscribe(),
        view_stopped,
        |json| info!(target: "view", "{json}"),
    )?;

    let app = Arc::new(Mutex::new(app));
    let polling = PollingLoop::new(client, Arc::clone(&app), interval).spawn();

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    polling.abort();

    // Events are queued synchronously, so the view drains the session
    // close before it stops.
    app.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .selection_mut()
        .clear();
    drop(stop_view);
    if view.join().is_err() {
        warn!("View thread panicked");
    }
    info!("👋 jpeg2video client stopped");
    Ok(())
}

/// Hands every event, as JSON, to `show` until `stopped` disconnects,
/// then drains whatever is still queued.
fn spawn_view<V>(
    app_events: Receiver<AppEvent>,
    player_events: Receiver<PlayerEvent>,
    stopped: Receiver<()>,
    mut show: V,
) -> std::io::Result<thread::JoinHandle<()>>
where
    V: FnMut(String) + Send + 'static,
{
    thread::Builder::new()
        .name("view".to_string())
        .spawn(move || {
            loop {
                select! {
                    recv(app_events) -> event => {
                        if let Ok(event) = event {
                            render(&event, &mut show);
                        }
                    }
                    recv(player_events) -> event => {
                        if let Ok(event) = event {
                            render(&event, &mut show);
                        }
                    }
                    recv(stopped) -> _ => break,
                }
            }
            app_events
                .try_iter()
                .for_each(|event| render(&event, &mut show));
            player_events
                .try_iter()
                .for_each(|event| render(&event, &mut show));
        })
}

fn render<T: serde::Serialize>(event: &T, show: &mut impl FnMut(String)) {
    match serde_json::to_string(event) {
        Ok(json) => show(json),
        Err(err) => warn!(target: "view", error = %err, "Unrenderable event"),
    }
}
