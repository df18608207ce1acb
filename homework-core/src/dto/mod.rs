//! Wire-level helpers for the homework-statuses API

pub mod response;
