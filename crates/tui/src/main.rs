mod config;
mod identity;
mod renderer;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use spriteboard_core::{CanvasClient, DocumentStore};
use spriteboard_store::GraphqlStore;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::renderer::TermRenderer;

/// Default sprite image, uploaded by whichever client bootstraps first.
const DEFAULT_SPRITE_ASSET: &[u8] = include_bytes!("../assets/sprite.png");

/// Accessibility text of the bootstrapped sprite image.
const SPRITE_DESCRIPTION: &str = "A pixelated sprite";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let public_id = identity::load_or_generate(&config.data_dir()?)?;
    info!(%public_id, node = %config.node_address, "starting");

    let store = Arc::new(
        GraphqlStore::new(&config.node_address)
            .with_context(|| format!("connecting to {}", config.node_address))?,
    );
    let mut client = CanvasClient::new(
        public_id,
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        DEFAULT_SPRITE_ASSET,
        SPRITE_DESCRIPTION,
    );

    setup_terminal()?;
    let result = run(&mut client, &store, config.sync_interval_ms).await;
    restore_terminal()?;
    result
}

/// Main loop: periodic sync passes interleaved with input events.
///
/// Sync ticks are serialized by construction — the interval is only polled
/// again once the previous pass has returned, so at most one pagination
/// pass is in flight at a time.
async fn run(client: &mut CanvasClient, store: &GraphqlStore, sync_interval_ms: u64) -> Result<()> {
    let mut renderer = TermRenderer::new();
    let mut events = spawn_input_thread();

    let mut ticker = tokio::time::interval(Duration::from_millis(sync_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Background failures are logged only; the next tick
                // retries with the updated exclusion set.
                if let Err(err) = client.sync_once(&mut renderer).await {
                    warn!(%err, "sync pass failed");
                }
            }
            maybe_event = events.recv() => {
                let Some(ev) = maybe_event else { break };
                if handle_event(client, store, &mut renderer, &ev).await? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// React to one terminal event. Returns `true` when the app should exit.
async fn handle_event(
    client: &mut CanvasClient,
    store: &GraphqlStore,
    renderer: &mut TermRenderer,
    ev: &Event,
) -> Result<bool> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(true);
            }
        }
        Event::Mouse(mouse) => {
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                let position = renderer::cell_to_position(mouse.column, mouse.row);
                match client.place_sprite(position, renderer).await {
                    Ok(record) => info!(
                        id = %record.id,
                        blob = %store.blob_url(&record.image.blob),
                        "sprite placed"
                    ),
                    // User-triggered, so surface it on screen too.
                    Err(err) => renderer.show_status(&format!("could not place sprite: {err}")),
                }
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Read crossterm events on a dedicated thread; they arrive over a channel
/// so the async loop can select between input and the sync timer.
fn spawn_input_thread() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    execute!(stdout(), Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}
