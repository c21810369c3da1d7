//! Bounded polling for conditions on a live page.
//!
//! Everything in the crate that has to wait for the UI (element states,
//! expectations, page readiness) goes through [`wait_for`].

mod error;
mod poller;

pub use error::{PollConfigError, WaitError};
pub use poller::{wait_for, PollConfig, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
