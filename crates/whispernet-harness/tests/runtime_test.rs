//! Runtime orchestration tests.
//!
//! Drive the real `Runtime` with a scripted `SimDriver` and check the push
//! subscription lifecycle, fire-and-forget sends, and failure surfacing.

use whispernet_app::{App, AppEvent, ConnectionState, KeyInput, Runtime};
use whispernet_core::{FocusPolicy, PeerId, Presence};
use whispernet_harness::{InvariantRegistry, ManualClock, SimDriver};

fn runtime(driver: &SimDriver) -> Runtime<SimDriver, ManualClock> {
    Runtime::new(driver.clone(), App::new(ManualClock::default(), FocusPolicy::Manual))
}

fn script_session(driver: &SimDriver) {
    driver.inject_peer_list(&["10.0.0.2", "10.0.0.3"]).unwrap();
    driver.inject_events([
        AppEvent::Key(KeyInput::Down),
        AppEvent::Key(KeyInput::Enter),
        AppEvent::Submit("hi there".into()),
    ]);
    driver.inject_message("10.0.0.3", "hello back").unwrap();
}

#[tokio::test]
async fn quit_closes_subscription_once() {
    let driver = SimDriver::new();
    script_session(&driver);
    driver.inject_events([AppEvent::Key(KeyInput::Esc), AppEvent::Submit("never sent".into())]);

    let mut runtime = runtime(&driver);
    runtime.run().await.unwrap();

    assert_eq!(driver.subscription_count(), 1);
    assert_eq!(driver.close_count(), 1);
    assert!(driver.has_pending());
    insta::assert_debug_snapshot!(driver.dispatched(), @r#"
    [
        SendRequest {
            recipient: "10.0.0.3",
            content: "hi there",
        },
    ]
    "#);
}

#[tokio::test]
async fn exhausted_input_closes_subscription_once() {
    let driver = SimDriver::new();
    script_session(&driver);

    let mut runtime = runtime(&driver);
    runtime.run().await.unwrap();

    assert_eq!(driver.close_count(), 1);
    assert!(!driver.has_pending());

    let app = runtime.app();
    assert_eq!(app.connection_state(), ConnectionState::Connected);
    assert_eq!(app.state().selected(), Some(&PeerId::from("10.0.0.3")));
    let contents: Vec<_> = app.state().messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hi there", "hello back"]);
}

#[tokio::test]
async fn driver_error_closes_subscription_once() {
    let driver = SimDriver::new();
    driver.inject_peer_list(&["10.0.0.2"]).unwrap();
    driver.fail_next_poll("stdin broke");

    let mut runtime = runtime(&driver);
    let result = runtime.run().await;

    assert!(result.is_err());
    assert_eq!(driver.close_count(), 1);
}

#[tokio::test]
async fn subscribe_failure_degrades_presence() {
    let driver = SimDriver::new();
    driver.fail_subscribe("connection refused");

    let mut runtime = runtime(&driver);
    let result = runtime.run().await;

    assert!(result.is_err());
    assert_eq!(driver.subscription_count(), 0);
    assert_eq!(driver.close_count(), 0);

    let app = runtime.app();
    assert_eq!(app.connection_state(), ConnectionState::Disconnected);
    assert_eq!(app.presence(), Presence::Degraded);
    assert!(app.status_message().is_some_and(|s| s.contains("connection refused")));
}

#[tokio::test]
async fn send_failure_is_reported_without_rollback() {
    let driver = SimDriver::new();
    driver.fail_sends("status 503");
    driver.inject_peer_list(&["10.0.0.2"]).unwrap();
    driver.inject_events([AppEvent::Key(KeyInput::Enter), AppEvent::Submit("ping".into())]);

    let mut runtime = runtime(&driver);
    runtime.run().await.unwrap();

    let app = runtime.app();
    assert_eq!(app.state().messages().len(), 1);
    assert_eq!(app.status_message(), Some("Send to 10.0.0.2 failed: status 503"));
    assert_eq!(driver.dispatched().len(), 1);
}

#[tokio::test]
async fn channel_close_keeps_session_usable() {
    let driver = SimDriver::new();
    driver.inject_peer_list(&["10.0.0.2"]).unwrap();
    driver.inject_events([
        AppEvent::Key(KeyInput::Enter),
        AppEvent::ChannelClosed { reason: "server went away".into() },
        AppEvent::Submit("still here".into()),
    ]);

    let mut runtime = runtime(&driver);
    runtime.run().await.unwrap();

    assert_eq!(runtime.app().presence(), Presence::Degraded);
    assert_eq!(runtime.app().state().peers().len(), 1);
    assert_eq!(driver.dispatched().len(), 1);
}

#[tokio::test]
async fn scripted_session_keeps_invariants() {
    let driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
    script_session(&driver);
    driver.inject_peer_list(&["10.0.0.2"]).unwrap();
    driver.inject_events([
        AppEvent::Key(KeyInput::End),
        AppEvent::Push("{broken".into()),
        AppEvent::Submit("   ".into()),
    ]);
    driver.inject_peer_list(&[]).unwrap();

    let mut runtime = runtime(&driver);
    runtime.run().await.unwrap();

    assert!(driver.render_count() > 0);
    assert_eq!(driver.violations(), Vec::<String>::new());
}
