//! Error types for sipflow-dialog-core
//!
//! Two taxonomies live here:
//!
//! - [`DialogError`]: dialog construction failures. Construction is atomic;
//!   any error means no dialog was built and nothing leaked. Compatibility
//!   degradations (missing remote tag, missing Contact) are *not* errors;
//!   they are logged as warnings and the field stays empty.
//! - [`TransactionError`]: transaction setup failures. Transport failures
//!   during a send are not represented here; they terminate the affected
//!   transaction via its event channel instead of returning an error.

use thiserror::Error;

use sipflow_sip_types::{Method, StatusCode};

/// Result type for dialog operations.
pub type DialogResult<T> = Result<T, DialogError>;

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// Errors that abort dialog construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    /// The locally generated half of the message carries no tag. A local UA
    /// always tags its own From (UAC) or To (UAS) header, so this indicates
    /// a broken caller, not a legacy peer.
    #[error("local tag missing; cannot establish dialog")]
    MissingLocalTag,

    /// The message has an empty Call-ID.
    #[error("empty Call-ID; cannot establish dialog")]
    EmptyCallId,

    /// Only non-100 provisional and 2xx responses establish dialogs.
    #[error("status {0} cannot establish a dialog")]
    NonDialogStatus(StatusCode),
}

/// Errors raised when setting up a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// INVITE and ACK never create non-INVITE server transactions.
    #[error("method {0} cannot create a non-INVITE server transaction")]
    InvalidMethod(Method),
}
