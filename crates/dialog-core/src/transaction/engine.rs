//! The generic transaction FSM engine.
//!
//! The engine is one function, [`dispatch`]: look up the handler bound to
//! the transaction's `(current state, event kind)` pair and invoke it.
//! Transaction-kind specific behavior lives behind [`TransactionLogic`]
//! (strategy pattern; each of the four RFC 3261 kinds implements it once);
//! the engine itself never inspects message contents.
//!
//! A lookup miss is not an error. Transports retransmit, and a duplicate
//! that arrives after the machine moved past the state that cared about it
//! is simply dropped.

use tracing::trace;

use super::event::SipEvent;
use super::key::TransactionKey;
use super::state::{TransactionKind, TransactionState};
use super::table::TransitionTable;

/// The minimum a transaction context must expose to be driven by the
/// engine.
pub trait TransactionContext {
    fn key(&self) -> &TransactionKey;
    fn state(&self) -> TransactionState;
}

/// State machine logic for one transaction kind.
///
/// Implementations own their transition table (built once in the
/// constructor) and map handler tags to the actual handler code in
/// [`invoke`](TransactionLogic::invoke). Handlers mutate the context
/// directly; the engine guarantees sequential application per transaction
/// by requiring `&mut` access.
#[async_trait::async_trait]
pub trait TransactionLogic: Send + Sync {
    /// The transaction context this state machine drives.
    type Context: TransactionContext + Send;
    /// Handler tag stored in the transition table rows.
    type Handler: Copy + Send + Sync;

    fn kind(&self) -> TransactionKind;

    fn table(&self) -> &TransitionTable<Self::Handler>;

    /// Run the handler bound to a table row.
    async fn invoke(&self, handler: Self::Handler, tx: &mut Self::Context, event: SipEvent);
}

/// Single entry point of the engine: apply one event to one transaction.
///
/// Events for the same transaction must not be dispatched concurrently;
/// the exclusive borrow makes that structural. Handlers may suspend on the
/// transport send, and state transitions happen only after the send
/// outcome is known.
pub async fn dispatch<L>(logic: &L, tx: &mut L::Context, event: SipEvent)
where
    L: TransactionLogic,
{
    let kind = event.kind();
    match logic.table().lookup(tx.state(), kind) {
        Some(handler) => logic.invoke(handler, tx, event).await,
        None => {
            trace!(id = %tx.key(), state = %tx.state(), event = ?kind,
                "no transition bound, dropping event");
        }
    }
}
