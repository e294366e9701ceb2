//! Read state and request sequencing.

/// State of an async read driven by form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReadState<T> {
    /// No read issued for the current input
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
    TimedOut,
}

impl<T> ReadState<T> {
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The read finished without a value.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Error(_) | Self::TimedOut)
    }
}

/// Token tying a response to the input that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// Monotonic request counter; only the latest id is current.
#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue a new id, superseding every earlier one.
    pub const fn next(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    pub const fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }
}
