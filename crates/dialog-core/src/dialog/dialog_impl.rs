//! Dialog implementation for RFC 3261 SIP dialogs
//!
//! This module contains the main [`Dialog`] struct: construction from
//! dialog-establishing responses (as UAC or UAS) and the in-dialog update
//! operations. Construction is atomic: any failure returns an error and
//! drops every partially captured field, so a half-built dialog is never
//! observable.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sipflow_sip_types::{Contact, NameAddr, Request, Response, StatusCode};

use super::dialog_id::DialogId;
use super::dialog_state::DialogState;
use crate::errors::{DialogError, DialogResult};

/// Which side of the dialog the local UA is.
///
/// The role decides which header (To vs From) holds the local tag and which
/// header's tag is authoritative when matching incoming messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogRole {
    /// The local UA sent the INVITE.
    Caller,
    /// The local UA answered it.
    Callee,
}

/// A SIP dialog as defined in RFC 3261 Section 12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// Unique identifier for this dialog
    pub id: DialogId,

    /// Current state of the dialog
    pub state: DialogState,

    /// Initiating or answering side
    pub role: DialogRole,

    /// Call-ID; immutable after creation
    pub call_id: String,

    /// Tag the local side put on its own header
    pub local_tag: String,

    /// Tag of the peer; `None` for RFC 2543 peers that never sent one
    pub remote_tag: Option<String>,

    /// Record-Route entries captured at creation, in header order.
    /// Length and order are fixed for the life of the dialog.
    pub route_set: Vec<NameAddr>,

    /// Local sequence counter; `None` until the first outgoing request
    pub local_cseq: Option<u32>,

    /// Remote sequence counter; `None` until the first incoming request
    pub remote_cseq: Option<u32>,

    /// Own To/From header value, depending on role
    pub local_uri: NameAddr,

    /// Peer's To/From header value, depending on role
    pub remote_uri: NameAddr,

    /// Peer's preferred target for future requests; replaced whenever a new
    /// Contact is observed, absent for peers that never send one
    pub remote_contact: Option<Contact>,

    /// Whether the dialog was established over a secure channel
    pub is_secure: bool,
}

impl Dialog {
    /// Create a dialog as UAC from a dialog-establishing response.
    ///
    /// The response must be a non-100 provisional (dialog starts Early) or
    /// a 2xx (starts Confirmed). The From tag is mandatory; the local side
    /// generated that request, so its absence is a hard failure. A missing
    /// To tag or Contact marks a legacy peer and is tolerated with a warning.
    pub fn init_as_uac(response: &Response) -> DialogResult<Self> {
        let state = establishing_state(response.status)?;

        if response.call_id.is_empty() {
            return Err(DialogError::EmptyCallId);
        }

        let local_tag = response
            .from
            .tag()
            .ok_or(DialogError::MissingLocalTag)?
            .to_string();

        let remote_tag = match response.to.tag() {
            Some(tag) => Some(tag.to_string()),
            None => {
                warn!(call_id = %response.call_id,
                    "remote UA appears to be RFC 2543 only (no tag in To header)");
                None
            }
        };

        let remote_contact = match response.first_contact() {
            Some(contact) => Some(contact.clone()),
            None => {
                warn!(call_id = %response.call_id,
                    "remote UA appears to be RFC 2543 only (no Contact in response)");
                None
            }
        };

        let dialog = Self {
            id: DialogId::new(),
            state,
            role: DialogRole::Caller,
            call_id: response.call_id.clone(),
            local_tag,
            remote_tag,
            route_set: response.record_routes.clone(),
            local_cseq: Some(response.cseq.seq),
            remote_cseq: None,
            local_uri: response.from.clone(),
            remote_uri: response.to.clone(),
            remote_contact,
            is_secure: false,
        };
        debug!(id = %dialog.id, call_id = %dialog.call_id, state = %dialog.state,
            "established dialog as UAC");
        Ok(dialog)
    }

    /// Create a dialog as UAS from the peer's INVITE and the response the
    /// local side is about to send.
    ///
    /// Tag roles swap relative to [`Dialog::init_as_uac`]: the local tag
    /// lives in the response's To header (mandatory), the remote tag in its
    /// From header (tolerated if absent). The remote Contact is taken from
    /// the *invite*, the peer's original request, not the response.
    pub fn init_as_uas(invite: &Request, response: &Response) -> DialogResult<Self> {
        let state = establishing_state(response.status)?;

        if response.call_id.is_empty() {
            return Err(DialogError::EmptyCallId);
        }

        let local_tag = response
            .to
            .tag()
            .ok_or(DialogError::MissingLocalTag)?
            .to_string();

        let remote_tag = match response.from.tag() {
            Some(tag) => Some(tag.to_string()),
            None => {
                warn!(call_id = %response.call_id,
                    "remote UA appears to be RFC 2543 only (no tag in From header)");
                None
            }
        };

        let remote_contact = match invite.first_contact() {
            Some(contact) => Some(contact.clone()),
            None => {
                warn!(call_id = %response.call_id,
                    "remote UA appears to be RFC 2543 only (no Contact in request)");
                None
            }
        };

        let dialog = Self {
            id: DialogId::new(),
            state,
            role: DialogRole::Callee,
            call_id: response.call_id.clone(),
            local_tag,
            remote_tag,
            route_set: response.record_routes.clone(),
            local_cseq: None,
            remote_cseq: Some(response.cseq.seq),
            local_uri: response.to.clone(),
            remote_uri: response.from.clone(),
            remote_contact,
            is_secure: invite.uri.is_secure(),
        };
        debug!(id = %dialog.id, call_id = %dialog.call_id, state = %dialog.state,
            "established dialog as UAS");
        Ok(dialog)
    }

    /// Update the remote target from an in-dialog request (UAS side).
    ///
    /// The protocol calls this a route-set update, but the route set itself
    /// is frozen at creation; only the remote Contact is replaced. An absent
    /// Contact clears the stored one.
    pub fn update_route_set_as_uas(&mut self, request: &Request) {
        self.replace_remote_contact(request.first_contact());
    }

    /// Record the peer's CSeq from an in-dialog request, unconditionally.
    /// Out-of-order and duplicate detection belong to the caller.
    pub fn update_cseq_as_uas(&mut self, request: &Request) {
        self.remote_cseq = Some(request.cseq.seq);
    }

    /// Update the remote target from an in-dialog response (UAC side).
    pub fn update_route_set_as_uac(&mut self, response: &Response) {
        self.replace_remote_contact(response.first_contact());
    }

    /// Adopt the To tag carried by a later response (UAC side).
    ///
    /// An early dialog created from a tag-less 1xx needs this once the 2xx
    /// arrives with the tag the peer finally chose.
    pub fn update_tag_as_uac(&mut self, response: &Response) {
        match response.to.tag() {
            Some(tag) => self.remote_tag = Some(tag.to_string()),
            None => {
                warn!(id = %self.id,
                    "remote UA appears to be RFC 2543 only (still no tag in To header)");
                self.remote_tag = None;
            }
        }
    }

    fn replace_remote_contact(&mut self, contact: Option<&Contact>) {
        // old value is dropped either way; keeping a stale target around
        // when the new message omits one would be worse
        match contact {
            Some(contact) => self.remote_contact = Some(contact.clone()),
            None => {
                warn!(id = %self.id,
                    "remote UA appears to be RFC 2543 only (no Contact in message)");
                self.remote_contact = None;
            }
        }
    }

    /// Force a state. Lifecycle triggers beyond dialog establishment come
    /// from the layer above.
    pub fn set_state(&mut self, state: DialogState) {
        if self.state != state {
            debug!(id = %self.id, previous = %self.state, new = %state, "dialog state change");
            self.state = state;
        }
    }

    /// Promote an early dialog to confirmed.
    pub fn confirm(&mut self) {
        self.set_state(DialogState::Confirmed);
    }

    /// Close the dialog. Terminal.
    pub fn close(&mut self) {
        self.set_state(DialogState::Closed);
    }

    pub fn is_closed(&self) -> bool {
        self.state == DialogState::Closed
    }

    /// Generate a tag value suitable for the local side of a new dialog.
    pub fn generate_local_tag() -> String {
        let mut rng = rand::thread_rng();
        format!("{:08x}", rng.gen::<u32>())
    }
}

/// The dialog state a response establishes, or the reason it cannot.
fn establishing_state(status: StatusCode) -> DialogResult<DialogState> {
    if status.is_trying() {
        // 100 is hop-by-hop and never creates dialog state
        return Err(DialogError::NonDialogStatus(status));
    }
    if status.is_provisional() {
        Ok(DialogState::Early)
    } else if status.is_success() {
        Ok(DialogState::Confirmed)
    } else {
        Err(DialogError::NonDialogStatus(status))
    }
}
