//! Dialog matching for incoming requests and responses
//!
//! Decides whether an incoming message belongs to a candidate dialog. The
//! algorithm is Call-ID equality plus tag comparison, with two deliberate
//! compatibility concessions for RFC 2543 peers:
//!
//! - **No-tag fallback**: a dialog recorded without a remote tag can only be
//!   matched by comparing the local/remote URI pair against the message's
//!   To/From headers, in the orientation implied by the dialog's role.
//! - **Orientation tie-break**: when both sides do have tags, some legacy
//!   peers swap which header they populate; the URI-pair check therefore
//!   accepts either of the two orderings before declaring a mismatch.
//!
//! The tie-break is intentionally permissive and can, in rare cases, match
//! unrelated dialogs from two non-compliant peers answering the same
//! request. Changing it requires a protocol-compatibility audit.
//!
//! Match failure is a normal negative result, never an error.

use sipflow_sip_types::{Request, Response};

use super::dialog_impl::{Dialog, DialogRole};

impl Dialog {
    /// Does an incoming response belong to this dialog? (UAC side)
    pub fn match_as_uac(&self, response: &Response) -> bool {
        if self.call_id != response.call_id {
            return false;
        }

        // for a caller the remote tag travels in the To header
        let message_tag = match self.role {
            DialogRole::Caller => response.to.tag(),
            DialogRole::Callee => response.from.tag(),
        };

        match message_tag {
            None => {
                // no tag in the response: only a dialog that also never saw
                // a remote tag can match, and then only by URI pair
                if self.remote_tag.is_some() {
                    return false;
                }
                match self.role {
                    DialogRole::Caller => {
                        self.remote_uri.same_uri(&response.to)
                            && self.local_uri.same_uri(&response.from)
                    }
                    DialogRole::Callee => {
                        self.local_uri.same_uri(&response.to)
                            && self.remote_uri.same_uri(&response.from)
                    }
                }
            }
            Some(tag) => {
                // an early dialog created without a tag cannot adopt one
                // mid-match; the caller must update the dialog first
                let Some(remote_tag) = self.remote_tag.as_deref() else {
                    return false;
                };
                let straight = self.remote_uri.same_uri(&response.to)
                    && self.local_uri.same_uri(&response.from);
                let swapped = self.local_uri.same_uri(&response.to)
                    && self.remote_uri.same_uri(&response.from);
                if !straight && !swapped {
                    return false;
                }
                tag == remote_tag
            }
        }
    }

    /// Does an incoming request belong to this dialog? (UAS side)
    ///
    /// Structurally symmetric to [`Dialog::match_as_uac`] with the header
    /// roles swapped: for a callee the remote tag travels in From.
    pub fn match_as_uas(&self, request: &Request) -> bool {
        if self.call_id != request.call_id {
            return false;
        }

        let message_tag = match self.role {
            DialogRole::Callee => request.from.tag(),
            DialogRole::Caller => request.to.tag(),
        };

        match message_tag {
            None => {
                if self.remote_tag.is_some() {
                    return false;
                }
                match self.role {
                    DialogRole::Callee => {
                        self.local_uri.same_uri(&request.to)
                            && self.remote_uri.same_uri(&request.from)
                    }
                    DialogRole::Caller => {
                        self.remote_uri.same_uri(&request.to)
                            && self.local_uri.same_uri(&request.from)
                    }
                }
            }
            Some(tag) => {
                let Some(remote_tag) = self.remote_tag.as_deref() else {
                    return false;
                };
                let straight = self.local_uri.same_uri(&request.to)
                    && self.remote_uri.same_uri(&request.from);
                let swapped = self.remote_uri.same_uri(&request.to)
                    && self.local_uri.same_uri(&request.from);
                if !straight && !swapped {
                    return false;
                }
                tag == remote_tag
            }
        }
    }
}
