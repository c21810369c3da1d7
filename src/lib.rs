pub mod browser;
pub mod config;
pub mod expect;
pub mod locator;
pub mod pages;
pub mod scenarios;
pub mod selectors;
pub mod wait;

pub use expect::expect;
pub use locator::Locator;
pub use wait::{wait_for, PollConfig, WaitError};
