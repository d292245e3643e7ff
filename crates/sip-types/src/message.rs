//! Structured request and response messages.
//!
//! The parsing layer assembles these from the wire; tests build them with
//! the chainable setters. The session layer only ever reads them or clones
//! the pieces it keeps.

use serde::{Deserialize, Serialize};

use crate::address::{Contact, NameAddr, Uri};
use crate::headers::{CSeq, Via};
use crate::method::Method;
use crate::status::StatusCode;

/// A structured SIP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub call_id: String,
    pub cseq: CSeq,
    pub from: NameAddr,
    pub to: NameAddr,
    pub vias: Vec<Via>,
    pub contacts: Vec<Contact>,
    pub record_routes: Vec<NameAddr>,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        let cseq = CSeq::new(method.clone(), 1);
        Self {
            method,
            uri: uri.clone(),
            call_id: String::new(),
            cseq,
            from: NameAddr::new(uri.clone()),
            to: NameAddr::new(uri),
            vias: Vec::new(),
            contacts: Vec::new(),
            record_routes: Vec::new(),
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = call_id.into();
        self
    }

    pub fn with_cseq(mut self, seq: u32) -> Self {
        self.cseq = CSeq::new(self.method.clone(), seq);
        self
    }

    pub fn with_from(mut self, from: NameAddr) -> Self {
        self.from = from;
        self
    }

    pub fn with_to(mut self, to: NameAddr) -> Self {
        self.to = to;
        self
    }

    pub fn with_via(mut self, via: Via) -> Self {
        self.vias.push(via);
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn with_record_route(mut self, route: NameAddr) -> Self {
        self.record_routes.push(route);
        self
    }

    pub fn first_via(&self) -> Option<&Via> {
        self.vias.first()
    }

    pub fn first_contact(&self) -> Option<&Contact> {
        self.contacts.first()
    }
}

/// A structured SIP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: StatusCode,
    pub call_id: String,
    pub cseq: CSeq,
    pub from: NameAddr,
    pub to: NameAddr,
    pub vias: Vec<Via>,
    pub contacts: Vec<Contact>,
    pub record_routes: Vec<NameAddr>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            call_id: String::new(),
            cseq: CSeq::new(Method::Invite, 1),
            from: NameAddr::new(Uri::sip_host("anonymous.invalid")),
            to: NameAddr::new(Uri::sip_host("anonymous.invalid")),
            vias: Vec::new(),
            contacts: Vec::new(),
            record_routes: Vec::new(),
        }
    }

    /// Build a response that answers `request`: Call-ID, CSeq, From, To and
    /// Via are copied over, as the (external) message layer would do.
    pub fn for_request(status: StatusCode, request: &Request) -> Self {
        Self {
            status,
            call_id: request.call_id.clone(),
            cseq: request.cseq.clone(),
            from: request.from.clone(),
            to: request.to.clone(),
            vias: request.vias.clone(),
            contacts: Vec::new(),
            record_routes: Vec::new(),
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = call_id.into();
        self
    }

    pub fn with_cseq(mut self, cseq: CSeq) -> Self {
        self.cseq = cseq;
        self
    }

    pub fn with_from(mut self, from: NameAddr) -> Self {
        self.from = from;
        self
    }

    pub fn with_to(mut self, to: NameAddr) -> Self {
        self.to = to;
        self
    }

    pub fn with_via(mut self, via: Via) -> Self {
        self.vias.push(via);
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn with_record_route(mut self, route: NameAddr) -> Self {
        self.record_routes.push(route);
        self
    }

    pub fn first_via(&self) -> Option<&Via> {
        self.vias.first()
    }

    pub fn first_contact(&self) -> Option<&Contact> {
        self.contacts.first()
    }
}
