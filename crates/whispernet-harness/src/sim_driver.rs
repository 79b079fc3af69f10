//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`whispernet_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Events are scripted up front (or injected through a cloned handle); when
//! the script runs out, `poll_event` reports exhausted input and the runtime
//! stops.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use whispernet_app::{App, AppEvent, Driver, Subscription};
use whispernet_core::{Clock, SendRequest};
use whispernet_proto::{NewMessage, PeerEntry, ProtocolError, PushEvent};

use crate::invariants::{ClientSnapshot, InvariantRegistry, SystemSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection and observation.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    dispatched: Vec<SendRequest>,
    renders: usize,
    subscriptions: usize,
    closes: usize,
    subscribe_error: Option<String>,
    poll_error: Option<String>,
    send_failure: Option<String>,
    last_snapshot: Option<ClientSnapshot>,
    violations: Vec<String>,
}

/// Push subscription handed out by [`SimDriver`].
#[derive(Debug)]
pub struct SimSubscription {
    state: Arc<Mutex<SharedState>>,
}

impl Subscription for SimSubscription {
    fn close(&mut self) {
        lock(&self.state).closes += 1;
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("pending_events", &self.pending_events.len())
            .field("closes", &self.closes)
            .finish_non_exhaustive()
    }
}

/// Simulation driver for deterministic testing.
///
/// Clones share state, so a test can keep a handle for injection and
/// inspection while the runtime owns the driver.
#[derive(Clone, Default)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check invariants on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        lock(&self.state).pending_events.push_back(event);
    }

    /// Inject several events in order.
    pub fn inject_events(&self, events: impl IntoIterator<Item = AppEvent>) {
        lock(&self.state).pending_events.extend(events);
    }

    /// Inject a push event as a wire frame.
    ///
    /// # Errors
    ///
    /// Encoding failures from [`PushEvent::encode`].
    pub fn inject_push(&self, event: &PushEvent) -> Result<(), ProtocolError> {
        let frame = event.encode()?;
        self.inject_event(AppEvent::Push(frame));
        Ok(())
    }

    /// Inject a peer list snapshot of bare identities.
    ///
    /// # Errors
    ///
    /// Encoding failures from [`PushEvent::encode`].
    pub fn inject_peer_list(&self, identities: &[&str]) -> Result<(), ProtocolError> {
        let entries = identities.iter().map(|id| PeerEntry::new(*id)).collect();
        self.inject_push(&PushEvent::PeerListUpdate(entries))
    }

    /// Inject an incoming message.
    ///
    /// # Errors
    ///
    /// Encoding failures from [`PushEvent::encode`].
    pub fn inject_message(&self, sender: &str, content: &str) -> Result<(), ProtocolError> {
        self.inject_push(&PushEvent::NewMessage(NewMessage {
            sender: sender.to_owned(),
            content: content.to_owned(),
        }))
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Make the next `subscribe` fail.
    pub fn fail_subscribe(&self, reason: impl Into<String>) {
        lock(&self.state).subscribe_error = Some(reason.into());
    }

    /// Make the next `poll_event` fail.
    pub fn fail_next_poll(&self, reason: impl Into<String>) {
        lock(&self.state).poll_error = Some(reason.into());
    }

    /// Answer every dispatched request with [`AppEvent::SendFailed`].
    pub fn fail_sends(&self, error: impl Into<String>) {
        lock(&self.state).send_failure = Some(error.into());
    }

    /// Requests handed to the transport so far.
    pub fn dispatched(&self) -> Vec<SendRequest> {
        lock(&self.state).dispatched.clone()
    }

    /// Number of renders.
    pub fn render_count(&self) -> usize {
        lock(&self.state).renders
    }

    /// Number of subscriptions opened.
    pub fn subscription_count(&self) -> usize {
        lock(&self.state).subscriptions
    }

    /// Number of times a subscription was closed.
    pub fn close_count(&self) -> usize {
        lock(&self.state).closes
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !lock(&self.state).pending_events.is_empty()
    }

    /// Invariant violations observed at render time.
    pub fn violations(&self) -> Vec<String> {
        lock(&self.state).violations.clone()
    }

    fn check_invariants<C: Clock>(&self, state: &mut SharedState, app: &App<C>) {
        let Some(registry) = &self.invariants else {
            return;
        };

        let mut snapshot = ClientSnapshot::from_app(0, app);
        if let Some(previous) = &state.last_snapshot {
            snapshot = snapshot.since(previous);
        }

        if let Err(violations) = registry.check_all(&SystemSnapshot::single(snapshot.clone())) {
            for violation in violations {
                tracing::error!(%violation, "invariant violated");
                state.violations.push(violation.to_string());
            }
        }
        state.last_snapshot = Some(snapshot);
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Subscription = SimSubscription;

    async fn subscribe(&mut self) -> Result<SimSubscription, SimDriverError> {
        let mut state = lock(&self.state);
        if let Some(reason) = state.subscribe_error.take() {
            return Err(SimDriverError(reason));
        }
        state.subscriptions += 1;
        Ok(SimSubscription { state: Arc::clone(&self.state) })
    }

    async fn poll_event(
        &mut self,
        _subscription: &mut SimSubscription,
    ) -> Result<Option<AppEvent>, SimDriverError> {
        let mut state = lock(&self.state);
        if let Some(reason) = state.poll_error.take() {
            return Err(SimDriverError(reason));
        }
        Ok(state.pending_events.pop_front())
    }

    fn dispatch(&mut self, request: SendRequest) {
        let mut state = lock(&self.state);
        if let Some(error) = state.send_failure.clone() {
            state.pending_events.push_front(AppEvent::SendFailed {
                recipient: request.recipient.clone(),
                error,
            });
        }
        state.dispatched.push(request);
    }

    fn render<C: Clock>(&mut self, app: &App<C>) -> Result<(), SimDriverError> {
        let mut state = lock(&self.state);
        state.renders += 1;
        self.check_invariants(&mut state, app);
        Ok(())
    }
}
