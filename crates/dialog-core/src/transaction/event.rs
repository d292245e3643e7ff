//! Events into and out of the transaction layer.
//!
//! [`SipEvent`] is the input side: classified stimuli dispatched into a
//! transaction's state machine. [`TransactionEvent`] is the output side:
//! notifications delivered to the transaction user over an mpsc channel.

use serde::{Deserialize, Serialize};

use sipflow_sip_types::{Method, Request, Response, StatusClass};

use super::key::TransactionKey;

/// A classified stimulus for a transaction state machine.
#[derive(Debug, Clone)]
pub enum SipEvent {
    /// A request arrived from the transport (first delivery or
    /// retransmission; the state machine tells them apart).
    ReceivedRequest(Request),
    /// The transaction user wants a provisional response sent.
    SendProvisional(Response),
    /// The transaction user wants a final response sent.
    SendFinal(Response),
    /// The host scheduler reports that Timer J expired.
    TimerJFired,
}

/// The lookup key half of an event: what transition tables are indexed by.
///
/// 2xx and 3xx–6xx finals are distinct kinds (they can be bound to
/// different handlers per RFC state machine), even though the non-INVITE
/// server machine binds both to the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ReceivedRequest,
    SendProvisional,
    SendFinal2xx,
    SendFinalNon2xx,
    TimerJ,
}

impl SipEvent {
    /// Build the right send event for a response based on its status.
    pub fn send_response(response: Response) -> Self {
        if response.status.is_provisional() {
            SipEvent::SendProvisional(response)
        } else {
            SipEvent::SendFinal(response)
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            SipEvent::ReceivedRequest(_) => EventKind::ReceivedRequest,
            SipEvent::SendProvisional(_) => EventKind::SendProvisional,
            SipEvent::SendFinal(response) if response.status.is_success() => {
                EventKind::SendFinal2xx
            }
            SipEvent::SendFinal(_) => EventKind::SendFinalNon2xx,
            SipEvent::TimerJFired => EventKind::TimerJ,
        }
    }
}

/// Method classification for the new-request announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerRequestKind {
    Register,
    Bye,
    Options,
    Info,
    Cancel,
    Notify,
    Subscribe,
    Unknown,
}

impl ServerRequestKind {
    pub fn classify(method: &Method) -> Self {
        match method {
            Method::Register => ServerRequestKind::Register,
            Method::Bye => ServerRequestKind::Bye,
            Method::Options => ServerRequestKind::Options,
            Method::Info => ServerRequestKind::Info,
            Method::Cancel => ServerRequestKind::Cancel,
            Method::Notify => ServerRequestKind::Notify,
            Method::Subscribe => ServerRequestKind::Subscribe,
            _ => ServerRequestKind::Unknown,
        }
    }
}

/// Notifications from a transaction to the transaction user.
///
/// Every variant carries the key of the transaction that produced it, so a
/// single receiver can serve many transactions.
#[derive(Debug, Clone)]
pub enum TransactionEvent {
    /// First delivery of the request that created this server transaction.
    /// Emitted exactly once, before the machine leaves PreTrying.
    NewRequest {
        key: TransactionKey,
        kind: ServerRequestKind,
        request: Request,
    },
    /// A retransmitted copy of the original request arrived and was
    /// discarded (the stored response, if any, was resent).
    RetransmittedRequest { key: TransactionKey },
    /// A provisional response went out on the wire.
    ProvisionalSent {
        key: TransactionKey,
        response: Response,
    },
    /// A final response went out on the wire.
    FinalSent {
        key: TransactionKey,
        class: StatusClass,
        response: Response,
    },
    /// A send failed; the transaction is dead.
    TransportError { key: TransactionKey },
    /// The transaction reached Terminated and must be destroyed now.
    Terminated { key: TransactionKey },
}
