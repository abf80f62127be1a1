use std::io::BufRead;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use splash_core::{update, BootState, Msg, Phase};
use splash_engine::{EngineConfig, EngineHandle, FetchSettings};
use splash_logging::splash_info;

use super::config::{self, SplashConfig};
use super::effects::{EffectRunner, FlowOutcome};
use super::logging::{self, LogDestination};
use super::ui;

pub fn run() -> anyhow::Result<()> {
    let config = config::load(Path::new(config::CONFIG_FILENAME))?;
    logging::initialize(LogDestination::Both);
    splash_info!(
        "splash starting at {} for target {}",
        Utc::now().to_rfc3339(),
        config.target
    );

    // One input thread for the process lifetime; each boot swaps in its own
    // sender so a retry typed after a reload still lands.
    let retry_slot: RetrySlot = Arc::new(Mutex::new(None));
    spawn_input_thread(retry_slot.clone());

    // A manual retry restarts the whole sequence, connectivity check included.
    loop {
        match run_boot(&config, &retry_slot)? {
            BootEnd::Done => break,
            BootEnd::Navigate(url) => {
                ui::render::navigate(&url);
                break;
            }
            BootEnd::Reload => {
                splash_info!("retry requested; restarting boot sequence");
            }
        }
    }
    Ok(())
}

enum BootEnd {
    Done,
    Navigate(String),
    Reload,
}

type RetrySlot = Arc<Mutex<Option<mpsc::Sender<Msg>>>>;

fn run_boot(config: &SplashConfig, retry_slot: &RetrySlot) -> anyhow::Result<BootEnd> {
    splash_logging::mark_boot_start();

    let mut state = BootState::new(config.target.clone(), config.policy(), config.seed());
    let engine = EngineHandle::new(EngineConfig {
        fetch: FetchSettings {
            request_timeout: config.request_timeout(),
            ..FetchSettings::default()
        },
        probe_timeout: config.probe_timeout(),
        ..EngineConfig::default()
    });
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(engine.clone(), msg_tx.clone());
    if let Ok(mut slot) = retry_slot.lock() {
        *slot = Some(msg_tx);
    }

    engine.check_connectivity(config.target.clone());

    let end = loop {
        if state.consume_dirty() {
            ui::render::render(&state.view());
        }
        if let Some(outcome) = runner.outcome() {
            break match outcome {
                FlowOutcome::Navigate { url } => BootEnd::Navigate(url),
                FlowOutcome::Reload => BootEnd::Reload,
            };
        }
        if state.phase() == &Phase::Done {
            break BootEnd::Done;
        }

        match msg_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(msg) => {
                let (next, effects) = update(state, msg);
                state = next;
                runner.run(effects);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break BootEnd::Done,
        }
    };

    // Reclaim the worker and the event pump before a possible reload spins
    // up their replacements.
    engine.shutdown();
    runner.join();
    Ok(end)
}

/// Forwards 'r' lines from stdin as retry requests to whichever boot is
/// currently running. Ends when stdin is exhausted.
fn spawn_input_thread(retry_slot: RetrySlot) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("r") || trimmed.eq_ignore_ascii_case("retry") {
                let tx = retry_slot.lock().ok().and_then(|slot| slot.clone());
                if let Some(tx) = tx {
                    let _ = tx.send(Msg::RetryRequested);
                }
            }
        }
    });
}
