//! Repository layer
//!
//! Narrow, trait-based views of the two remote services the poll loop talks
//! to. The HTTP clients from `homework-client` implement them; tests plug in
//! in-memory fakes.

mod homework;
mod notifier;

pub use homework::HomeworkRepository;
pub use notifier::Notifier;
