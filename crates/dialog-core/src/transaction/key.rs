//! Transaction identification.

use std::fmt;

use serde::{Deserialize, Serialize};

use sipflow_sip_types::Request;

/// Opaque identifier for a transaction.
///
/// The surrounding transaction layer assigns keys when it demultiplexes
/// incoming messages; this core only carries them through logging and
/// application events. [`TransactionKey::from_request`] derives a usable
/// key from the request identity for hosts that have nothing better.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionKey(String);

impl TransactionKey {
    pub fn new(key: impl Into<String>) -> Self {
        TransactionKey(key.into())
    }

    /// Derive a key from the method, Call-ID and CSeq of a request.
    pub fn from_request(request: &Request) -> Self {
        TransactionKey(format!(
            "{}-{}-{}",
            request.method, request.call_id, request.cseq.seq
        ))
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
