//! Core domain types
//!
//! The status catalog and the review record extracted from one element of
//! the remote `homeworks` list.

pub mod record;
pub mod status;
