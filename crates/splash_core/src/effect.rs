use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Kick off the HTTP GET for the target document.
    StartFetch { target: String },
    /// Fire a `Msg::ProgressTick` after the delay.
    ScheduleTick { after: Duration },
    /// Build the replacement document and apply it to the host surface.
    Inject { text: String, source_url: String },
    /// Last-resort recovery: leave the splash and go straight to the target.
    Navigate { url: String },
    /// Deferred navigation used by the auto-recovery policy.
    ScheduleNavigate { url: String, after: Duration },
    /// Restart the whole boot sequence (manual retry).
    Reload,
    /// Fire a `Msg::NoticeExpired` after the delay.
    ScheduleNoticeExpiry { after: Duration },
}
