//! Simulation harness for WhisperNet
//!
//! Runs the real [`whispernet_app::Runtime`] against a scripted driver and
//! checks behavioural invariants after every transition.
//!
//! # Components
//!
//! - [`SimDriver`]: scripted [`whispernet_app::Driver`] recording sends,
//!   renders and subscription closes
//! - [`ManualClock`]: deterministic capture timestamps
//! - [`invariants`]: registry of properties that must hold for any event
//!   sequence

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod clock;
pub mod invariants;
mod sim_driver;

pub use clock::ManualClock;
pub use invariants::{
    ClientSnapshot, FocusInRange, Invariant, InvariantRegistry, InvariantResult, LogAppendOnly,
    SelectionInPeers, SystemSnapshot, UniquePeers, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError, SimSubscription};
