//! SIP transaction layer
//!
//! Implements the transaction state machines of RFC 3261 Section 17 as a
//! table-driven engine:
//!
//! - [`TransitionTable`]: ordered `(state, event kind) → handler` bindings,
//!   built once per transaction kind
//! - [`dispatch`] + [`TransactionLogic`]: the generic engine and the
//!   per-kind strategy trait it drives
//! - [`ServerTransaction`]: the per-transaction context (state, original
//!   request, last response, Timer J, bound transport, event channel)
//! - [`NistLogic`]: the concrete non-INVITE server machine (Section 17.2.2)
//!
//! The transaction user receives [`TransactionEvent`]s over an mpsc channel
//! and feeds stimuli back in as [`SipEvent`]s. Timer J firing is delivered
//! the same way by whatever scheduler the host runs, using
//! [`ServerTransaction::timer_j_deadline`] to know when.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use sipflow_sip_types::{Method, Request, Response, Transport};

use crate::errors::{TransactionError, TransactionResult};

pub mod engine;
pub mod event;
pub mod key;
pub mod server;
pub mod state;
pub mod table;
pub mod timer;

pub use engine::{dispatch, TransactionContext, TransactionLogic};
pub use event::{EventKind, ServerRequestKind, SipEvent, TransactionEvent};
pub use key::TransactionKey;
pub use server::non_invite::{NistHandler, NistLogic};
pub use state::{TransactionKind, TransactionState};
pub use table::TransitionTable;
pub use timer::{TimerJ, TimerSettings};

/// Context of one server transaction: the part of the transaction layer
/// this core owns and mutates.
///
/// One instance exists per transaction. Events must be applied one at a
/// time (the engine's `&mut` access enforces this); different transactions
/// are independent and share only read-only tables.
#[derive(Debug)]
pub struct ServerTransaction {
    key: TransactionKey,
    state: TransactionState,
    orig_request: Request,
    last_response: Option<Response>,
    timer_j: TimerJ,
    transport: Arc<dyn Transport>,
    events_tx: mpsc::Sender<TransactionEvent>,
    timer_settings: TimerSettings,
}

impl ServerTransaction {
    /// Create a non-INVITE server transaction in PreTrying state.
    ///
    /// The received request is stored as the original request; the same
    /// request is then dispatched as a
    /// [`SipEvent::ReceivedRequest`] to announce it to the application and
    /// move the machine to Trying.
    pub fn new(
        key: TransactionKey,
        request: Request,
        transport: Arc<dyn Transport>,
        events_tx: mpsc::Sender<TransactionEvent>,
        timer_settings: TimerSettings,
    ) -> TransactionResult<Self> {
        if matches!(request.method, Method::Invite | Method::Ack) {
            return Err(TransactionError::InvalidMethod(request.method));
        }
        Ok(Self {
            key,
            state: TransactionState::PreTrying,
            orig_request: request,
            last_response: None,
            timer_j: TimerJ::default(),
            transport,
            events_tx,
            timer_settings,
        })
    }

    pub fn key(&self) -> &TransactionKey {
        &self.key
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn original_request(&self) -> &Request {
        &self.orig_request
    }

    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    pub fn timer_j(&self) -> &TimerJ {
        &self.timer_j
    }

    /// When the host scheduler should dispatch
    /// [`SipEvent::TimerJFired`]; `None` while the timer is unarmed.
    pub fn timer_j_deadline(&self) -> Option<std::time::Instant> {
        self.timer_j.deadline()
    }

    pub(crate) fn set_state(&mut self, new_state: TransactionState) {
        if self.state != new_state {
            debug!(id = %self.key, previous = %self.state, new = %new_state,
                "transaction state change");
            self.state = new_state;
        }
    }

    /// Replace the stored last response; the previous one is dropped.
    pub(crate) fn store_last_response(&mut self, response: Response) {
        self.last_response = Some(response);
    }

    pub(crate) fn timer_j_mut(&mut self) -> &mut TimerJ {
        &mut self.timer_j
    }

    pub(crate) fn timer_settings(&self) -> &TimerSettings {
        &self.timer_settings
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Deliver a notification to the transaction user. A dropped receiver
    /// is logged, not propagated: the transaction outcome does not depend
    /// on whether anyone is listening.
    pub(crate) async fn notify(&self, event: TransactionEvent) {
        if self.events_tx.send(event).await.is_err() {
            warn!(id = %self.key, "transaction user dropped its event receiver");
        }
    }
}

impl TransactionContext for ServerTransaction {
    fn key(&self) -> &TransactionKey {
        &self.key
    }

    fn state(&self) -> TransactionState {
        self.state
    }
}
