//! Dialog lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle of a dialog.
///
/// ```text
/// Early ──2xx──▶ Confirmed ──(external trigger)──▶ Closed
/// ```
///
/// A dialog created from a non-100 provisional response starts Early; one
/// created from a 2xx starts Confirmed. Closing is terminal and is driven
/// by the layer above (BYE handling is outside this core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogState {
    /// Established by a provisional response; identity may still be partial.
    Early,
    /// Established or promoted by a final 2xx response.
    Confirmed,
    /// Terminal.
    Closed,
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogState::Early => write!(f, "Early"),
            DialogState::Confirmed => write!(f, "Confirmed"),
            DialogState::Closed => write!(f, "Closed"),
        }
    }
}
