use std::fmt;
use std::time::Duration;

use crate::progress::ProgressSim;
use crate::view_model::BootViewModel;

/// Phase of one boot sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Init,
    Offline,
    Fetching,
    Injecting,
    Done,
    Failed(BootFailure),
}

/// Why the boot could not complete normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootFailure {
    Timeout,
    HttpStatus(u16),
    Network,
    InvalidUrl,
    Decode,
    Injection,
}

impl fmt::Display for BootFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootFailure::Timeout => write!(f, "the request timed out"),
            BootFailure::HttpStatus(code) => write!(f, "the server answered with status {code}"),
            BootFailure::Network => write!(f, "network error"),
            BootFailure::InvalidUrl => write!(f, "the target address is not a valid url"),
            BootFailure::Decode => write!(f, "the document could not be decoded"),
            BootFailure::Injection => write!(f, "the document could not be assembled"),
        }
    }
}

/// What to do when the fetch fails. Variants correspond to the two recovery
/// behaviours observed in deployed loaders; the choice is configuration, not
/// a hardcoded default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Wait for the user to retry.
    ManualRetry,
    /// Navigate straight to the target after the delay as a last resort.
    AutoNavigate { delay: Duration },
}

/// Decoded target document text plus the URL it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub text: String,
    pub source_url: String,
}

/// State for one boot sequence. Owned by the host message loop and advanced
/// exclusively through [`crate::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct BootState {
    target: String,
    policy: FailurePolicy,
    phase: Phase,
    sim: ProgressSim,
    pending: Option<FetchedDocument>,
    settled: bool,
    notice_visible: bool,
    dirty: bool,
}

impl BootState {
    pub fn new(target: impl Into<String>, policy: FailurePolicy, progress_seed: u64) -> Self {
        Self {
            target: target.into(),
            policy,
            phase: Phase::Init,
            sim: ProgressSim::new(progress_seed),
            pending: None,
            settled: false,
            notice_visible: false,
            dirty: true,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn sim(&self) -> &ProgressSim {
        &self.sim
    }

    pub fn view(&self) -> BootViewModel {
        BootViewModel::from_state(self)
    }

    pub(crate) fn notice_visible(&self) -> bool {
        self.notice_visible
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn has_settled(&self) -> bool {
        self.settled
    }

    pub(crate) fn mark_settled(&mut self) {
        self.settled = true;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn advance_sim(&mut self) {
        let before = self.sim.pct();
        self.sim.advance();
        if self.sim.pct() != before {
            self.dirty = true;
        }
    }

    pub(crate) fn begin_finalize(&mut self) {
        self.sim.begin_finalize();
    }

    pub(crate) fn halt_sim(&mut self) {
        self.sim.halt();
    }

    pub(crate) fn store_pending(&mut self, doc: FetchedDocument) {
        self.pending = Some(doc);
    }

    pub(crate) fn take_pending(&mut self) -> Option<FetchedDocument> {
        self.pending.take()
    }

    pub(crate) fn show_notice(&mut self) {
        self.notice_visible = true;
        self.dirty = true;
    }

    pub(crate) fn hide_notice(&mut self) {
        self.notice_visible = false;
        self.dirty = true;
    }
}
