//! Sender and receiver panels as plain state.
//!
//! Each view owns its form fields and the state of the reads and the write it
//! triggers. Setters return the read requests an edit makes necessary; the
//! caller performs them and hands the result back with the request id, so a
//! response for superseded input is dropped instead of overwriting newer state.

pub mod decimals;
pub mod error;
pub mod receiver;
pub mod sender;
pub mod state;

pub use decimals::{DecimalsField, DecimalsRequest};
pub use error::FormError;
pub use receiver::{AllowanceRequest, ReceiverView};
pub use sender::SenderView;
pub use state::{ReadState, RequestId, RequestSeq};

/// Label of the submit control while a write is in flight, if any.
const fn busy_label(status: &action::TxStatus) -> Option<&'static str> {
    match status {
        action::TxStatus::Pending => Some("Confirming..."),
        action::TxStatus::Confirming(_) => Some("Waiting for confirmation..."),
        _ => None,
    }
}

/// Text shown for an unset field.
fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
