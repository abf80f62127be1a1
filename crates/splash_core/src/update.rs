use std::time::Duration;

use crate::{BootFailure, BootState, Effect, FailurePolicy, Msg, Phase};

/// How long the transient offline notice stays visible.
const NOTICE_DURATION: Duration = Duration::from_millis(4_500);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BootState, msg: Msg) -> (BootState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConnectivityChecked { online } => {
            if state.phase() != &Phase::Init {
                return (state, Vec::new());
            }
            if online {
                state.set_phase(Phase::Fetching);
                let mut effects = vec![Effect::StartFetch {
                    target: state.target().to_string(),
                }];
                if let Some(after) = state.sim().next_delay() {
                    effects.push(Effect::ScheduleTick { after });
                }
                effects
            } else {
                // Offline at boot: no request is ever issued.
                state.set_phase(Phase::Offline);
                Vec::new()
            }
        }
        Msg::ProgressTick => {
            if state.phase() != &Phase::Fetching {
                // The simulator must not write to the surface once the boot
                // has moved past fetching.
                return (state, Vec::new());
            }
            state.advance_sim();
            if state.sim().is_complete() {
                // The gauge reads exactly 100 before injection begins.
                match state.take_pending() {
                    Some(doc) => {
                        state.set_phase(Phase::Injecting);
                        vec![Effect::Inject {
                            text: doc.text,
                            source_url: doc.source_url,
                        }]
                    }
                    None => Vec::new(),
                }
            } else {
                state
                    .sim()
                    .next_delay()
                    .map(|after| Effect::ScheduleTick { after })
                    .into_iter()
                    .collect()
            }
        }
        Msg::FetchSettled { result } => {
            if state.phase() != &Phase::Fetching || state.has_settled() {
                // Only one settle counts per boot.
                return (state, Vec::new());
            }
            state.mark_settled();
            match result {
                Ok(doc) => {
                    state.store_pending(doc);
                    state.begin_finalize();
                    // One tick is always in flight while fetching; it picks up
                    // the finalize cadence on its own. Scheduling another here
                    // would fork the chain and double the tick rate.
                    Vec::new()
                }
                Err(failure) => {
                    state.halt_sim();
                    let policy = state.policy();
                    state.set_phase(Phase::Failed(failure));
                    match policy {
                        FailurePolicy::AutoNavigate { delay } => vec![Effect::ScheduleNavigate {
                            url: state.target().to_string(),
                            after: delay,
                        }],
                        FailurePolicy::ManualRetry => Vec::new(),
                    }
                }
            }
        }
        Msg::InjectionApplied => {
            if state.phase() == &Phase::Injecting {
                state.set_phase(Phase::Done);
            }
            Vec::new()
        }
        Msg::InjectionFailed { message: _ } => {
            if state.phase() != &Phase::Injecting {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Failed(BootFailure::Injection));
            vec![Effect::Navigate {
                url: state.target().to_string(),
            }]
        }
        Msg::RetryRequested => match state.phase() {
            Phase::Offline | Phase::Failed(_) => vec![Effect::Reload],
            _ => Vec::new(),
        },
        Msg::WentOffline => {
            state.show_notice();
            vec![Effect::ScheduleNoticeExpiry {
                after: NOTICE_DURATION,
            }]
        }
        Msg::NoticeExpired => {
            state.hide_notice();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
