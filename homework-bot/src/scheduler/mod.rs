//! Scheduler layer
//!
//! Runs the poll-parse-compare-notify cycle on a fixed period and owns the
//! in-memory state used to suppress duplicate notifications.

pub mod poller;
pub mod state;

pub use poller::StatusPoller;
