//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use whispernet_core::{Clock, SendRequest};

use crate::{App, AppEvent};

/// An open push channel subscription.
pub trait Subscription: Send {
    /// Stop delivery and release the underlying channel.
    ///
    /// Called exactly once, by [`SubscriptionGuard`].
    fn close(&mut self);
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs against a live server and in simulation.
///
/// # Implementations
///
/// - **Client**: WebSocket push channel, HTTP sends, line-based terminal input
/// - **Simulation**: scripted events and recorded sends
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Push channel handle.
    type Subscription: Subscription;

    /// Open the push channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be established.
    fn subscribe(&mut self) -> impl Future<Output = Result<Self::Subscription, Self::Error>> + Send;

    /// Wait for the next event from user input or the subscription.
    ///
    /// Returns `None` once input is exhausted.
    fn poll_event(
        &mut self,
        subscription: &mut Self::Subscription,
    ) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Hand a request to the transport without waiting for it.
    ///
    /// Delivery failures come back later as [`AppEvent::SendFailed`].
    fn dispatch(&mut self, request: SendRequest);

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<C: Clock>(&mut self, app: &App<C>) -> Result<(), Self::Error>;
}

/// Owns a [`Subscription`] and closes it exactly once.
///
/// Closing happens on [`release`](Self::release) or on drop, whichever comes
/// first, so early returns and unwinding release the channel too.
#[derive(Debug)]
pub struct SubscriptionGuard<S: Subscription> {
    subscription: S,
    closed: bool,
}

impl<S: Subscription> SubscriptionGuard<S> {
    /// Take ownership of an open subscription.
    pub fn new(subscription: S) -> Self {
        Self { subscription, closed: false }
    }

    /// Borrow the subscription for polling.
    pub fn subscription(&mut self) -> &mut S {
        &mut self.subscription
    }

    /// Whether the subscription has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the subscription now.
    pub fn release(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if !self.closed {
            self.closed = true;
            self.subscription.close();
        }
    }
}

impl<S: Subscription> Drop for SubscriptionGuard<S> {
    fn drop(&mut self) {
        self.close_once();
    }
}
