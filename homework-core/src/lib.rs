//! Homework Core
//!
//! Core types and pure logic for the homework review watcher.
//!
//! This crate contains:
//! - Domain types: review statuses and their verdicts, review records
//! - DTOs: validation of the raw homework-statuses response
//! - Formatting: turning a review record into a notification line
//!
//! Nothing here performs I/O; the client and bot crates feed it decoded JSON.

pub mod domain;
pub mod dto;
pub mod error;
pub mod format;

pub use domain::record::ReviewRecord;
pub use domain::status::HomeworkStatus;
pub use error::{FormatError, ValidationError};
pub use format::{format_status, parse_status};
