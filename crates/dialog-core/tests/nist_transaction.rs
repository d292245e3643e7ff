//! End-to-end runs of the non-INVITE server transaction against a mock
//! transport: the happy path through Trying/Proceeding/Completed, Timer J
//! expiry, retransmission absorption and transport failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use sipflow_dialog_core::errors::TransactionError;
use sipflow_dialog_core::transaction::{
    dispatch, NistLogic, ServerTransaction, SipEvent, TimerSettings, TransactionEvent,
    TransactionKey, TransactionState,
};
use sipflow_sip_types::{
    Method, NameAddr, Request, Response, StatusClass, StatusCode, Transport, TransportError, Uri,
    Via,
};

/// Captures every send; can be flipped into failure mode to simulate a dead
/// socket.
#[derive(Debug, Default)]
struct MockTransport {
    sent: Mutex<Vec<(Response, String, u16)>>,
    fail_sends: AtomicBool,
}

impl MockTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing() -> Arc<Self> {
        let transport = Self::default();
        transport.fail_sends.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    fn sent(&self) -> Vec<(Response, String, u16)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send_response(
        &self,
        response: &Response,
        host: &str,
        port: u16,
    ) -> Result<(), TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed {
                host: host.to_string(),
                port,
                message: "connection refused".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((response.clone(), host.to_string(), port));
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn register_request() -> Request {
    Request::new(Method::Register, Uri::sip_host("registrar.example.com"))
        .with_call_id("reg-1@client.atlanta.com")
        .with_cseq(1)
        .with_from(NameAddr::new(Uri::sip("alice", "atlanta.com")).with_tag("ft-1"))
        .with_to(NameAddr::new(Uri::sip("alice", "atlanta.com")))
        .with_via(Via::new("198.51.100.1", 5060))
}

fn new_transaction(
    transport: Arc<MockTransport>,
    settings: TimerSettings,
) -> (ServerTransaction, mpsc::Receiver<TransactionEvent>) {
    init_tracing();
    let (events_tx, events_rx) = mpsc::channel(16);
    let request = register_request();
    let key = TransactionKey::from_request(&request);
    let tx = ServerTransaction::new(key, request, transport, events_tx, settings).unwrap();
    (tx, events_rx)
}

fn drain(rx: &mut mpsc::Receiver<TransactionEvent>) -> Vec<TransactionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

#[test]
fn invite_and_ack_are_not_non_invite_transactions() {
    let (events_tx, _events_rx) = mpsc::channel(1);
    let invite = Request::new(Method::Invite, Uri::sip("bob", "biloxi.com"));
    let result = ServerTransaction::new(
        TransactionKey::new("k1"),
        invite,
        MockTransport::new(),
        events_tx,
        TimerSettings::default(),
    );
    assert!(matches!(
        result,
        Err(TransactionError::InvalidMethod(Method::Invite))
    ));
}

#[tokio::test]
async fn first_request_is_announced_exactly_once() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());
    assert_eq!(tx.state(), TransactionState::PreTrying);

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;

    assert_eq!(tx.state(), TransactionState::Trying);
    let delivered = drain(&mut events);
    assert_eq!(delivered.len(), 1);
    assert!(matches!(&delivered[0], TransactionEvent::NewRequest { .. }));

    // a duplicate arriving before any response exists has no table row and
    // is dropped without a second announcement
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request)).await;
    assert_eq!(tx.state(), TransactionState::Trying);
    assert!(drain(&mut events).is_empty());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn provisional_then_final_runs_to_completed() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    drain(&mut events);

    let trying = Response::for_request(StatusCode::TRYING, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(trying)).await;
    assert_eq!(tx.state(), TransactionState::Proceeding);
    assert!(matches!(
        drain(&mut events).as_slice(),
        [TransactionEvent::ProvisionalSent { .. }]
    ));

    let ok = Response::for_request(StatusCode::OK, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(ok.clone())).await;
    assert_eq!(tx.state(), TransactionState::Completed);
    let delivered = drain(&mut events);
    assert_eq!(delivered.len(), 1);
    match &delivered[0] {
        TransactionEvent::FinalSent {
            class, response, ..
        } => {
            assert_eq!(*class, StatusClass::Success);
            assert_eq!(response, &ok);
        }
        other => panic!("expected FinalSent, got {other:?}"),
    }

    // both responses went to the first Via of the request
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].1, "198.51.100.1");
    assert_eq!(sent[1].2, 5060);

    assert!(tx.timer_j().is_armed());
    assert_eq!(tx.timer_j().length, Some(Duration::from_secs(32)));
    assert!(tx.timer_j_deadline().is_some());
}

#[tokio::test]
async fn final_without_provisional_skips_proceeding() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport, TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    drain(&mut events);

    let busy = Response::for_request(StatusCode(486), &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(busy)).await;

    assert_eq!(tx.state(), TransactionState::Completed);
    match drain(&mut events).as_slice() {
        [TransactionEvent::FinalSent { class, .. }] => {
            assert_eq!(*class, StatusClass::ClientError);
        }
        other => panic!("expected one FinalSent, got {other:?}"),
    }
}

#[tokio::test]
async fn completed_retransmission_resends_stored_response_verbatim() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    let ok = Response::for_request(StatusCode::OK, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(ok)).await;
    drain(&mut events);

    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request)).await;

    // still Completed; the duplicate was answered with the same bytes
    assert_eq!(tx.state(), TransactionState::Completed);
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);

    let delivered = drain(&mut events);
    assert_eq!(delivered.len(), 2);
    assert!(matches!(
        &delivered[0],
        TransactionEvent::RetransmittedRequest { .. }
    ));
    assert!(matches!(&delivered[1], TransactionEvent::FinalSent { .. }));
}

#[tokio::test]
async fn timer_j_terminates_exactly_once() {
    let logic = NistLogic::new();
    let (mut tx, mut events) = new_transaction(MockTransport::new(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    let ok = Response::for_request(StatusCode::OK, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(ok)).await;
    drain(&mut events);
    assert!(tx.timer_j().is_armed());

    dispatch(&logic, &mut tx, SipEvent::TimerJFired).await;
    assert_eq!(tx.state(), TransactionState::Terminated);
    assert!(!tx.timer_j().is_armed());
    assert_eq!(tx.timer_j_deadline(), None);
    assert!(matches!(
        drain(&mut events).as_slice(),
        [TransactionEvent::Terminated { .. }]
    ));

    // a stale fire after termination is dropped, not double-reported
    dispatch(&logic, &mut tx, SipEvent::TimerJFired).await;
    assert_eq!(tx.state(), TransactionState::Terminated);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn requests_after_termination_are_ignored() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    let ok = Response::for_request(StatusCode::OK, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(ok)).await;
    dispatch(&logic, &mut tx, SipEvent::TimerJFired).await;
    drain(&mut events);
    let sends_before = transport.sent().len();

    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request)).await;
    assert!(drain(&mut events).is_empty());
    assert_eq!(transport.sent().len(), sends_before);
}

#[tokio::test]
async fn transport_failure_kills_the_transaction() {
    let logic = NistLogic::new();
    let transport = MockTransport::failing();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    drain(&mut events);

    let busy = Response::for_request(StatusCode(486), &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(busy)).await;

    assert_eq!(tx.state(), TransactionState::Terminated);
    assert!(!tx.timer_j().is_armed());
    assert!(transport.sent().is_empty());
    let delivered = drain(&mut events);
    assert_eq!(delivered.len(), 2);
    assert!(matches!(
        &delivered[0],
        TransactionEvent::TransportError { .. }
    ));
    assert!(matches!(&delivered[1], TransactionEvent::Terminated { .. }));
}

#[tokio::test]
async fn failed_resend_in_completed_clears_timer_j() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    let ok = Response::for_request(StatusCode::OK, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(ok)).await;
    drain(&mut events);
    assert!(tx.timer_j().is_armed());

    // the socket dies before the next retransmission arrives
    transport.set_failing(true);
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request)).await;

    assert_eq!(tx.state(), TransactionState::Terminated);
    assert!(!tx.timer_j().is_armed());
    assert_eq!(tx.timer_j_deadline(), None);
    let delivered = drain(&mut events);
    assert_eq!(delivered.len(), 3);
    assert!(matches!(
        &delivered[0],
        TransactionEvent::RetransmittedRequest { .. }
    ));
    assert!(matches!(
        &delivered[1],
        TransactionEvent::TransportError { .. }
    ));
    assert!(matches!(&delivered[2], TransactionEvent::Terminated { .. }));
}

#[tokio::test]
async fn via_less_final_is_stored_but_not_sent() {
    let logic = NistLogic::new();
    let transport = MockTransport::new();
    let (mut tx, mut events) = new_transaction(transport.clone(), TimerSettings::default());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    drain(&mut events);

    let mut ok = Response::for_request(StatusCode::OK, &request);
    ok.vias.clear();
    dispatch(&logic, &mut tx, SipEvent::send_response(ok.clone())).await;

    // stored first, then dropped at the send step: no transition, no event
    assert_eq!(tx.last_response(), Some(&ok));
    assert_eq!(tx.state(), TransactionState::Trying);
    assert!(!tx.timer_j().is_armed());
    assert!(transport.sent().is_empty());
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn reliable_transport_uses_zero_timer_j() {
    let logic = NistLogic::new();
    let (mut tx, mut events) =
        new_transaction(MockTransport::new(), TimerSettings::for_reliable_transport());

    let request = tx.original_request().clone();
    dispatch(&logic, &mut tx, SipEvent::ReceivedRequest(request.clone())).await;
    let ok = Response::for_request(StatusCode::OK, &request);
    dispatch(&logic, &mut tx, SipEvent::send_response(ok)).await;
    drain(&mut events);

    // armed with a zero length: the deadline is already due
    assert!(tx.timer_j().is_armed());
    assert_eq!(tx.timer_j().length, Some(Duration::ZERO));
    let deadline = tx.timer_j_deadline().unwrap();
    assert!(deadline <= std::time::Instant::now());
}
