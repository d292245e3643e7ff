//! SIP request method classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The request methods the session layer distinguishes.
///
/// Anything outside the RFC 3261 / RFC 3265 set handled by the server
/// transaction layer is carried verbatim in [`Method::Other`] so the
/// application still sees it (announced as an unknown request).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Invite,
    Ack,
    Register,
    Bye,
    Options,
    Info,
    Cancel,
    Notify,
    Subscribe,
    /// Any other method, kept as received.
    Other(String),
}

impl Method {
    /// Whether this method establishes an INVITE transaction.
    pub fn is_invite(&self) -> bool {
        matches!(self, Method::Invite)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Invite => write!(f, "INVITE"),
            Method::Ack => write!(f, "ACK"),
            Method::Register => write!(f, "REGISTER"),
            Method::Bye => write!(f, "BYE"),
            Method::Options => write!(f, "OPTIONS"),
            Method::Info => write!(f, "INFO"),
            Method::Cancel => write!(f, "CANCEL"),
            Method::Notify => write!(f, "NOTIFY"),
            Method::Subscribe => write!(f, "SUBSCRIBE"),
            Method::Other(name) => write!(f, "{}", name),
        }
    }
}
