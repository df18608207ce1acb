//! Poll state

/// Mutable state carried from one cycle to the next
///
/// Lives only in memory; a restart begins again from the current time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound sent as `from_date` on the next fetch
    pub cursor: i64,
    /// Last status message that reached the chat
    pub last_message: String,
    /// Last failure report that reached the chat
    pub last_error: String,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    /// State whose cursor is the current unix time
    pub fn starting_now() -> Self {
        Self::new(chrono::Utc::now().timestamp())
    }
}
