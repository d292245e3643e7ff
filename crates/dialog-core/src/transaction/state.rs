//! Transaction states and kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Distinguishes the four fundamental SIP transaction types of RFC 3261
/// Section 17. Each kind follows its own state machine; only the
/// non-INVITE server kind is instantiated by this crate, the engine and
/// transition table are generic over all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// RFC 3261 Section 17.1.1
    InviteClient,
    /// RFC 3261 Section 17.1.2
    NonInviteClient,
    /// RFC 3261 Section 17.2.1
    InviteServer,
    /// RFC 3261 Section 17.2.2
    NonInviteServer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::InviteClient => write!(f, "InviteClient"),
            TransactionKind::NonInviteClient => write!(f, "NonInviteClient"),
            TransactionKind::InviteServer => write!(f, "InviteServer"),
            TransactionKind::NonInviteServer => write!(f, "NonInviteServer"),
        }
    }
}

/// States of a server transaction state machine.
///
/// For the non-INVITE server kind the path is
/// `PreTrying → Trying → Proceeding → Completed → Terminated`,
/// where PreTrying covers the window between transaction creation and the
/// first dispatch of the received request, and Terminated is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionState {
    PreTrying,
    Trying,
    Proceeding,
    Completed,
    Terminated,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::PreTrying => write!(f, "PreTrying"),
            TransactionState::Trying => write!(f, "Trying"),
            TransactionState::Proceeding => write!(f, "Proceeding"),
            TransactionState::Completed => write!(f, "Completed"),
            TransactionState::Terminated => write!(f, "Terminated"),
        }
    }
}
