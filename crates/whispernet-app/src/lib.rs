//! Application layer for WhisperNet
//!
//! Pure state machine and generic runtime for the chat client, so the same
//! orchestration code runs against a real WebSocket and in deterministic
//! simulation.
//!
//! # Components
//!
//! - [`App`]: session state machine (push events, keyboard navigation,
//!   composer, connection presence)
//! - [`Driver`]: trait for platform-specific I/O
//! - [`SubscriptionGuard`]: releases the push subscription exactly once
//! - [`Runtime`]: generic orchestration loop using a Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use driver::{Driver, Subscription, SubscriptionGuard};
pub use event::AppEvent;
pub use input::{Composer, KeyInput};
pub use runtime::Runtime;
pub use state::{ConnectionState, Pane};
