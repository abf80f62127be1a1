use splash_core::{update, BootState, FailurePolicy, Msg};

#[test]
fn update_is_noop() {
    let state = BootState::new("home.html", FailurePolicy::ManualRetry, 0);
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
