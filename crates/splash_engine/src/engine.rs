use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use splash_logging::{splash_info, splash_warn};

use crate::connectivity::{ConnectivityProbe, TcpProbe};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::EngineEvent;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub probe_timeout: Duration,
    /// How often the background watcher re-probes connectivity.
    pub watch_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            probe_timeout: Duration::from_millis(1_500),
            watch_interval: Duration::from_secs(5),
        }
    }
}

enum EngineCommand {
    CheckConnectivity { target: String },
    Fetch { target: String },
    Shutdown,
}

/// Handle to the engine worker thread. Commands go in over a channel, events
/// come back out; the host polls with [`EngineHandle::try_recv`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    cancel: CancellationToken,
    worker: Arc<Mutex<Option<thread::JoinHandle<()>>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        let probe = Arc::new(TcpProbe {
            connect_timeout: config.probe_timeout,
        });
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let watch_interval = config.watch_interval;

        let worker = thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let watcher_started = Arc::new(AtomicBool::new(false));
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    break;
                }
                let fetcher = fetcher.clone();
                let probe = probe.clone();
                let event_tx = event_tx.clone();
                let cancel = worker_cancel.clone();
                let watcher_started = watcher_started.clone();
                runtime.spawn(async move {
                    handle_command(
                        fetcher.as_ref(),
                        probe,
                        command,
                        event_tx,
                        cancel,
                        watch_interval,
                        watcher_started,
                    )
                    .await;
                });
            }
            // Stop the watcher; dropping the runtime then reclaims its pool.
            worker_cancel.cancel();
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            cancel,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    pub fn check_connectivity(&self, target: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::CheckConnectivity {
            target: target.into(),
        });
    }

    pub fn fetch(&self, target: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            target: target.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .ok()
            .and_then(|rx| rx.try_recv().ok())
    }

    /// True once [`EngineHandle::shutdown`] has run on any clone.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the watcher, the worker thread, and the runtime it owns. Blocks
    /// until the worker has exited. Safe to call more than once.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Ok(mut worker) = self.worker.lock() {
            if let Some(handle) = worker.take() {
                let _ = handle.join();
            }
        }
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    probe: Arc<TcpProbe>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
    watch_interval: Duration,
    watcher_started: Arc<AtomicBool>,
) {
    match command {
        EngineCommand::CheckConnectivity { target } => {
            let online = blocking_probe(probe.clone(), target.clone()).await;
            splash_info!("connectivity probe for {}: online={}", target, online);
            let _ = event_tx.send(EngineEvent::ConnectivityChecked { online });

            // One watcher per engine, started after the first successful probe.
            if online && !watcher_started.swap(true, Ordering::SeqCst) {
                tokio::spawn(watch_connectivity(
                    probe,
                    target,
                    event_tx,
                    cancel,
                    watch_interval,
                ));
            }
        }
        EngineCommand::Fetch { target } => {
            let result = fetcher.fetch(&target).await;
            if let Err(err) = &result {
                splash_warn!("fetch of {} failed: {} ({})", target, err.kind, err.message);
            }
            let _ = event_tx.send(EngineEvent::FetchSettled { result });
        }
        // Consumed by the worker loop before dispatch.
        EngineCommand::Shutdown => {}
    }
}

/// Re-probes on an interval and reports the online-to-offline transition used
/// for the transient notice. Exits when the token is cancelled.
async fn watch_connectivity(
    probe: Arc<TcpProbe>,
    target: String,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
    interval: Duration,
) {
    let mut was_online = true;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        let online = blocking_probe(probe.clone(), target.clone()).await;
        if was_online && !online {
            splash_warn!("connectivity lost while watching {}", target);
            if event_tx.send(EngineEvent::WentOffline).is_err() {
                break;
            }
        }
        was_online = online;
    }
}

async fn blocking_probe(probe: Arc<TcpProbe>, target: String) -> bool {
    tokio::task::spawn_blocking(move || probe.is_online(&target))
        .await
        .unwrap_or(false)
}
