//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: client state machine
//! - [`Driver`]: platform-specific I/O
//!
//! The push subscription is held in a [`SubscriptionGuard`] for the whole
//! loop, so it is closed exactly once whether the loop quits, runs out of
//! input, or fails.

use whispernet_core::Clock;

use crate::{App, AppAction, AppEvent, Driver, SubscriptionGuard};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `C`: Clock used to timestamp messages
pub struct Runtime<D, C>
where
    D: Driver,
    C: Clock,
{
    driver: D,
    app: App<C>,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Clock,
{
    /// Create a new runtime around an existing App.
    pub fn new(driver: D, app: App<C>) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop.
    ///
    /// 1. Opens the push subscription
    /// 2. Polls the driver for the next event
    /// 3. Feeds it to the App and executes the resulting actions
    ///
    /// Returns when the App asks to quit or the driver has no more input.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let actions = self.app.handle(AppEvent::Connecting);
        self.process_actions(actions)?;

        let subscription = match self.driver.subscribe().await {
            Ok(subscription) => subscription,
            Err(error) => {
                tracing::error!(%error, "failed to open push channel");
                let actions = self.app.handle(AppEvent::ChannelClosed { reason: error.to_string() });
                self.process_actions(actions)?;
                return Err(error);
            },
        };
        let mut guard = SubscriptionGuard::new(subscription);

        let actions = self.app.handle(AppEvent::ChannelOpened);
        if self.process_actions(actions)? {
            guard.release();
            return Ok(());
        }

        loop {
            let Some(event) = self.driver.poll_event(guard.subscription()).await? else {
                tracing::debug!("input exhausted");
                break;
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                break;
            }
        }

        guard.release();
        Ok(())
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Send(request) => self.driver.dispatch(request),
                AppAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<C> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<C> {
        &mut self.app
    }

    /// Get a reference to the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runtime, returning its parts.
    pub fn into_parts(self) -> (D, App<C>) {
        (self.driver, self.app)
    }
}
