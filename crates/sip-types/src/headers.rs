//! Header values the session layer reads directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::method::Method;

/// A Via header value, reduced to the fields the transaction layer needs:
/// where to send responses and retransmissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    pub host: String,
    pub port: u16,
}

impl Via {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A CSeq header value: method plus sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CSeq {
    pub method: Method,
    pub seq: u32,
}

impl CSeq {
    pub fn new(method: Method, seq: u32) -> Self {
        Self { method, seq }
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seq, self.method)
    }
}
