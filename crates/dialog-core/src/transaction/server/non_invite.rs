//! Non-INVITE server transaction (RFC 3261 Section 17.2.2)
//!
//! The machine:
//!
//! ```text
//! PreTrying ──request──▶ Trying ──1xx──▶ Proceeding ──final──▶ Completed
//!                           │                                     │
//!                           └───────────final────────────────────▶│
//!                                                            Timer J
//!                                                                 ▼
//!                                                            Terminated
//! ```
//!
//! While Proceeding or Completed, retransmitted copies of the request are
//! absorbed and answered with the stored last response. Any transport
//! failure terminates the transaction on the spot; retries belong to the
//! layer above, if anywhere.

use tracing::{debug, warn};

use sipflow_sip_types::{TransportError, Via};

use super::super::engine::TransactionLogic;
use super::super::event::{EventKind, ServerRequestKind, SipEvent, TransactionEvent};
use super::super::state::{TransactionKind, TransactionState};
use super::super::table::TransitionTable;
use super::super::ServerTransaction;

/// Handler tags for the non-INVITE server transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NistHandler {
    ReceiveRequest,
    SendProvisional,
    SendFinal,
    TimerJ,
}

/// The non-INVITE server state machine logic. One instance can drive any
/// number of transactions; the table inside is built once and only read.
#[derive(Debug)]
pub struct NistLogic {
    table: TransitionTable<NistHandler>,
}

impl NistLogic {
    pub fn new() -> Self {
        Self {
            table: Self::transition_table(),
        }
    }

    /// The RFC 3261 Section 17.2.2 transition table.
    ///
    /// There is deliberately no (Trying, ReceivedRequest) row: announcing
    /// the request again would be useless since the transaction cannot
    /// have sent any response yet, so a duplicate that early is dropped by
    /// the lookup miss.
    fn transition_table() -> TransitionTable<NistHandler> {
        use EventKind::*;
        use TransactionState::*;

        TransitionTable::new(TransactionKind::NonInviteServer)
            .on(PreTrying, ReceivedRequest, NistHandler::ReceiveRequest)
            .on(Trying, SendProvisional, NistHandler::SendProvisional)
            .on(Trying, SendFinal2xx, NistHandler::SendFinal)
            .on(Trying, SendFinalNon2xx, NistHandler::SendFinal)
            .on(Proceeding, SendProvisional, NistHandler::SendProvisional)
            .on(Proceeding, SendFinal2xx, NistHandler::SendFinal)
            .on(Proceeding, SendFinalNon2xx, NistHandler::SendFinal)
            .on(Proceeding, ReceivedRequest, NistHandler::ReceiveRequest)
            .on(Completed, EventKind::TimerJ, NistHandler::TimerJ)
            .on(Completed, ReceivedRequest, NistHandler::ReceiveRequest)
    }
}

impl Default for NistLogic {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TransactionLogic for NistLogic {
    type Context = ServerTransaction;
    type Handler = NistHandler;

    fn kind(&self) -> TransactionKind {
        TransactionKind::NonInviteServer
    }

    fn table(&self) -> &TransitionTable<NistHandler> {
        &self.table
    }

    async fn invoke(&self, handler: NistHandler, tx: &mut ServerTransaction, event: SipEvent) {
        match handler {
            NistHandler::ReceiveRequest => receive_request(tx, event).await,
            NistHandler::SendProvisional => send_provisional(tx, event).await,
            NistHandler::SendFinal => send_final(tx, event).await,
            NistHandler::TimerJ => timer_j_fired(tx).await,
        }
    }
}

/// First reception announces the request to the application and moves to
/// Trying; anything later is a retransmission to be absorbed.
async fn receive_request(tx: &mut ServerTransaction, event: SipEvent) {
    let SipEvent::ReceivedRequest(request) = event else {
        return;
    };

    if tx.state() == TransactionState::PreTrying {
        let kind = ServerRequestKind::classify(&tx.original_request().method);
        debug!(id = %tx.key(), method = %tx.original_request().method,
            "announcing new server request");
        tx.notify(TransactionEvent::NewRequest {
            key: tx.key().clone(),
            kind,
            request: tx.original_request().clone(),
        })
        .await;
        tx.set_state(TransactionState::Trying);
        return;
    }

    // Proceeding or Completed: the duplicate payload is discarded
    drop(request);
    tx.notify(TransactionEvent::RetransmittedRequest {
        key: tx.key().clone(),
    })
    .await;

    let Some(response) = tx.last_response().cloned() else {
        // nothing sent yet, nothing to retransmit
        return;
    };
    let Some(via) = response.first_via().cloned() else {
        warn!(id = %tx.key(), "stored response has no Via; cannot retransmit");
        return;
    };

    match tx
        .transport()
        .send_response(&response, &via.host, via.port)
        .await
    {
        Err(error) => fail_transport(tx, &via, error).await,
        Ok(()) => {
            // the stored response goes out verbatim; report it under the
            // class it carries
            if response.status.is_provisional() {
                tx.notify(TransactionEvent::ProvisionalSent {
                    key: tx.key().clone(),
                    response,
                })
                .await;
            } else {
                tx.notify(TransactionEvent::FinalSent {
                    key: tx.key().clone(),
                    class: response.status.class(),
                    response,
                })
                .await;
            }
            // already in the proper state; no transition
        }
    }
}

/// Store and send a provisional response, then move to Proceeding.
async fn send_provisional(tx: &mut ServerTransaction, event: SipEvent) {
    let SipEvent::SendProvisional(response) = event else {
        return;
    };

    // stored before the send attempt, so a later retransmission answers
    // with this response even if the send below never happens
    tx.store_last_response(response.clone());

    let Some(via) = response.first_via().cloned() else {
        warn!(id = %tx.key(), "response has no Via; cannot send");
        return;
    };

    match tx
        .transport()
        .send_response(&response, &via.host, via.port)
        .await
    {
        Err(error) => fail_transport(tx, &via, error).await,
        Ok(()) => {
            tx.notify(TransactionEvent::ProvisionalSent {
                key: tx.key().clone(),
                response,
            })
            .await;
            tx.set_state(TransactionState::Proceeding);
        }
    }
}

/// Store and send a final response, arm Timer J and move to Completed.
async fn send_final(tx: &mut ServerTransaction, event: SipEvent) {
    let SipEvent::SendFinal(response) = event else {
        return;
    };

    tx.store_last_response(response.clone());

    let Some(via) = response.first_via().cloned() else {
        warn!(id = %tx.key(), "response has no Via; cannot send");
        return;
    };

    match tx
        .transport()
        .send_response(&response, &via.host, via.port)
        .await
    {
        Err(error) => fail_transport(tx, &via, error).await,
        Ok(()) => {
            tx.notify(TransactionEvent::FinalSent {
                key: tx.key().clone(),
                class: response.status.class(),
                response,
            })
            .await;

            // guard against re-arming on a second final send; it should
            // not happen per protocol but costs nothing to check
            if tx.state() != TransactionState::Completed {
                let wait = tx.timer_settings().wait_time_j;
                tx.timer_j_mut().arm(wait);
                debug!(id = %tx.key(), interval = ?wait, "armed Timer J");
            }
            tx.set_state(TransactionState::Completed);
        }
    }
}

/// Timer J expired: pure cleanup, sends nothing.
async fn timer_j_fired(tx: &mut ServerTransaction) {
    debug!(id = %tx.key(), "Timer J fired, terminating");
    tx.timer_j_mut().clear();
    tx.set_state(TransactionState::Terminated);
    tx.notify(TransactionEvent::Terminated {
        key: tx.key().clone(),
    })
    .await;
}

/// A send failed: the transaction is unusable. Report the error, force
/// Terminated and request immediate destruction.
async fn fail_transport(tx: &mut ServerTransaction, via: &Via, error: TransportError) {
    warn!(id = %tx.key(), target = %via, error = %error,
        "transport send failed, terminating transaction");
    tx.notify(TransactionEvent::TransportError {
        key: tx.key().clone(),
    })
    .await;
    // a resend can fail while Completed, with Timer J still running
    tx.timer_j_mut().clear();
    tx.set_state(TransactionState::Terminated);
    tx.notify(TransactionEvent::Terminated {
        key: tx.key().clone(),
    })
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_the_rfc_rows() {
        let logic = NistLogic::new();
        let table = logic.table();
        assert_eq!(table.len(), 10);
        assert_eq!(table.kind(), TransactionKind::NonInviteServer);

        assert_eq!(
            table.lookup(TransactionState::PreTrying, EventKind::ReceivedRequest),
            Some(NistHandler::ReceiveRequest)
        );
        assert_eq!(
            table.lookup(TransactionState::Trying, EventKind::SendFinal2xx),
            Some(NistHandler::SendFinal)
        );
        assert_eq!(
            table.lookup(TransactionState::Completed, EventKind::TimerJ),
            Some(NistHandler::TimerJ)
        );
    }

    #[test]
    fn inapplicable_pairs_have_no_row() {
        let logic = NistLogic::new();
        let table = logic.table();

        // a duplicate in Trying is dropped, not announced again
        assert_eq!(
            table.lookup(TransactionState::Trying, EventKind::ReceivedRequest),
            None
        );
        // nothing is applicable after termination
        assert_eq!(
            table.lookup(TransactionState::Terminated, EventKind::TimerJ),
            None
        );
        assert_eq!(
            table.lookup(TransactionState::Terminated, EventKind::ReceivedRequest),
            None
        );
    }
}
