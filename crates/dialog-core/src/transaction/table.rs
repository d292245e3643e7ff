//! The transition table: ordered `(state, event kind) → handler` bindings.
//!
//! One table exists per transaction kind, built once at startup and only
//! read afterwards, so sharing it across transactions (and threads) is
//! safe. There is deliberately no global instance: whoever manages
//! transactions owns the table and passes it in, which also lets tests
//! build throwaway tables.

use super::event::EventKind;
use super::state::{TransactionKind, TransactionState};

/// An immutable, ordered transition table.
///
/// Lookup is a linear scan with first-match-wins semantics. The tables are
/// small and fixed (the non-INVITE server one has ten rows), so a scan
/// beats a map in practice and keeps the row order meaningful.
#[derive(Debug, Clone)]
pub struct TransitionTable<H> {
    kind: TransactionKind,
    entries: Vec<(TransactionState, EventKind, H)>,
}

impl<H: Copy> TransitionTable<H> {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Append a binding. Used only while building the table.
    pub fn on(mut self, state: TransactionState, event: EventKind, handler: H) -> Self {
        self.entries.push((state, event, handler));
        self
    }

    /// Find the handler bound to `(state, event)`, if any. `None` means the
    /// event is inapplicable in this state and must be silently dropped;
    /// SIP allows retransmissions to arrive after the machine has moved on.
    pub fn lookup(&self, state: TransactionState, event: EventKind) -> Option<H> {
        self.entries
            .iter()
            .find(|(s, e, _)| *s == state && *e == event)
            .map(|(_, _, handler)| *handler)
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
