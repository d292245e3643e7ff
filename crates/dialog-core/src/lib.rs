//! SIP session-layer core: dialog management and transaction state machines
//!
//! This crate implements the two RFC 3261 subsystems that bind individual
//! SIP messages to long-lived call state:
//!
//! - **Dialogs** ([`dialog`]): persistent call context keyed by Call-ID and
//!   the local/remote tag pair, created from responses to INVITE and matched
//!   against every in-dialog message afterwards, including the RFC 2543
//!   no-tag compatibility fallback.
//! - **Transactions** ([`transaction`]): a table-driven finite state machine
//!   engine with one concrete instantiation, the non-INVITE server
//!   transaction of RFC 3261 Section 17.2.2 (Timer J, retransmission
//!   absorption, transport-failure termination).
//!
//! Message parsing and transport I/O are collaborators, consumed through the
//! narrow types in `sipflow-sip-types`. The application layer observes the
//! transaction through a [`TransactionEvent`](transaction::TransactionEvent)
//! channel.
//!
//! ## Concurrency model
//!
//! One state machine instance exists per transaction. Events for a single
//! transaction must be applied sequentially; the engine enforces this by
//! taking the transaction by `&mut`. Different transactions share nothing
//! mutable: the transition table is built once and only read afterwards.

pub mod dialog;
pub mod errors;
pub mod transaction;

pub use dialog::{Dialog, DialogId, DialogRole, DialogState};
pub use errors::{DialogError, DialogResult, TransactionError, TransactionResult};
pub use transaction::{
    dispatch, NistLogic, ServerTransaction, SipEvent, TransactionEvent, TransactionKey,
    TransactionKind, TransactionState,
};
