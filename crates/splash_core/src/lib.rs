//! Splash core: pure boot state machine and view-model helpers.
mod effect;
mod msg;
mod progress;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use progress::{ProgressGauge, ProgressSim, HOLD_PCT, START_PCT, STEP_INCREMENTS};
pub use state::{BootFailure, BootState, FailurePolicy, FetchedDocument, Phase};
pub use update::update;
pub use view_model::{BootViewModel, OFFLINE_NOTICE};
