#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup connectivity probe result.
    ConnectivityChecked { online: bool },
    /// A scheduled simulator tick fired.
    ProgressTick,
    /// The fetch settled, one way or the other.
    FetchSettled {
        result: Result<crate::FetchedDocument, crate::BootFailure>,
    },
    /// The host applied the assembled document.
    InjectionApplied,
    /// The host failed to assemble or apply the document.
    InjectionFailed { message: String },
    /// User asked to retry from the offline or error screen.
    RetryRequested,
    /// The connectivity watcher saw a transition to offline.
    WentOffline,
    /// The transient offline notice timed out.
    NoticeExpired,
    /// Fallback for placeholder wiring.
    NoOp,
}
