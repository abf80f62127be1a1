use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use splash_core::{BootFailure, Effect, FetchedDocument, Msg};
use splash_engine::{EngineEvent, EngineHandle, FailureKind, LoggingScriptSink};
use splash_logging::{splash_error, splash_info};

use super::ui;

/// How the boot sequence leaves the message loop, when it does not simply
/// finish in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Navigate { url: String },
    Reload,
}

/// Bridges core effects to the engine, timer threads, and the render surface,
/// and pumps engine events back into the message loop.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
    outcome: Arc<Mutex<Option<FlowOutcome>>>,
    pump: thread::JoinHandle<()>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        let pump = spawn_event_loop(engine.clone(), msg_tx.clone());
        Self {
            engine,
            msg_tx,
            outcome: Arc::new(Mutex::new(None)),
            pump,
        }
    }

    /// The settled outcome, once one of the terminal effects has fired.
    pub fn outcome(&self) -> Option<FlowOutcome> {
        self.outcome.lock().ok().and_then(|guard| guard.clone())
    }

    /// Waits for the event pump to exit. Call after the engine has shut down,
    /// so a reloaded boot never runs beside a stale pump.
    pub fn join(self) {
        let _ = self.pump.join();
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartFetch { target } => {
                    splash_info!("starting fetch of {}", target);
                    self.engine.fetch(target);
                }
                Effect::ScheduleTick { after } => {
                    self.send_after(after, Msg::ProgressTick);
                }
                Effect::ScheduleNoticeExpiry { after } => {
                    self.send_after(after, Msg::NoticeExpired);
                }
                Effect::Inject { text, source_url } => {
                    self.apply_document(&text, &source_url);
                }
                Effect::Navigate { url } => {
                    self.settle(FlowOutcome::Navigate { url });
                }
                Effect::ScheduleNavigate { url, after } => {
                    let outcome = self.outcome.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        settle_outcome(&outcome, FlowOutcome::Navigate { url });
                    });
                }
                Effect::Reload => {
                    self.settle(FlowOutcome::Reload);
                }
            }
        }
    }

    fn settle(&self, outcome: FlowOutcome) {
        settle_outcome(&self.outcome, outcome);
    }

    fn send_after(&self, after: Duration, msg: Msg) {
        let tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(after);
            let _ = tx.send(msg);
        });
    }

    fn apply_document(&self, text: &str, source_url: &str) {
        match splash_engine::build_document(text, source_url) {
            Ok(doc) => {
                splash_info!(
                    "document assembled from {} at boot+{}ms",
                    source_url,
                    splash_logging::boot_elapsed_ms()
                );
                ui::render::apply_document(&doc);
                doc.dispatch_scripts(&LoggingScriptSink);
                let _ = self.msg_tx.send(Msg::InjectionApplied);
            }
            Err(err) => {
                splash_error!("document assembly failed: {}", err);
                let _ = self.msg_tx.send(Msg::InjectionFailed {
                    message: err.to_string(),
                });
            }
        }
    }

}

fn spawn_event_loop(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        if let Some(event) = engine.try_recv() {
            let msg = match event {
                EngineEvent::ConnectivityChecked { online } => Msg::ConnectivityChecked { online },
                EngineEvent::WentOffline => Msg::WentOffline,
                EngineEvent::FetchSettled { result } => Msg::FetchSettled {
                    result: result
                        .map(|output| FetchedDocument {
                            text: output.text,
                            source_url: output.metadata.final_url,
                        })
                        .map_err(|err| map_failure(err.kind)),
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        } else if engine.is_shut_down() {
            break;
        } else {
            thread::sleep(Duration::from_millis(20));
        }
    })
}

fn settle_outcome(outcome: &Arc<Mutex<Option<FlowOutcome>>>, value: FlowOutcome) {
    if let Ok(mut guard) = outcome.lock() {
        // First terminal effect wins; a pending auto-navigation cannot
        // override a retry the user already issued.
        if guard.is_none() {
            *guard = Some(value);
        }
    }
}

fn map_failure(kind: FailureKind) -> BootFailure {
    match kind {
        FailureKind::InvalidUrl => BootFailure::InvalidUrl,
        FailureKind::HttpStatus(code) => BootFailure::HttpStatus(code),
        FailureKind::Timeout => BootFailure::Timeout,
        FailureKind::TooLarge { .. } => BootFailure::Network,
        FailureKind::Decode => BootFailure::Decode,
        FailureKind::Network => BootFailure::Network,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splash_engine::EngineConfig;

    // Hangs (and fails on the harness timeout) if the pump thread never
    // notices the shutdown.
    #[test]
    fn event_pump_exits_once_the_engine_shuts_down() {
        let engine = EngineHandle::new(EngineConfig::default());
        let (msg_tx, _msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(engine.clone(), msg_tx);

        engine.shutdown();
        runner.join();
    }
}
