use crate::{BootState, FailurePolicy, Phase};

/// Non-blocking overlay text shown while the watcher reports offline.
pub const OFFLINE_NOTICE: &str = "You are offline; some features may not load";

/// Everything the renderer needs, derived from [`BootState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootViewModel {
    pub phase: Phase,
    /// Displayed percentage, rounded. Monotonic within one boot.
    pub percent: u8,
    /// Human-readable failure text, present in `Offline` and `Failed`.
    pub message: Option<String>,
    /// Whether a manual retry action should be offered.
    pub retry_available: bool,
    /// Whether a deferred navigation is pending behind the failure screen.
    pub auto_recovery: bool,
    pub notice: Option<&'static str>,
}

impl BootViewModel {
    pub(crate) fn from_state(state: &BootState) -> Self {
        let phase = state.phase().clone();
        let message = match &phase {
            Phase::Offline => Some(
                "Please connect to the internet. This page needs network access to load your site content.".to_string(),
            ),
            Phase::Failed(failure) => Some(format!("Unable to load content: {failure}")),
            _ => None,
        };
        let retry_available = matches!(phase, Phase::Offline | Phase::Failed(_));
        let auto_recovery = matches!(phase, Phase::Failed(_))
            && matches!(state.policy(), FailurePolicy::AutoNavigate { .. });

        Self {
            phase,
            percent: state.sim().rounded(),
            message,
            retry_available,
            auto_recovery,
            notice: state.notice_visible().then_some(OFFLINE_NOTICE),
        }
    }
}
