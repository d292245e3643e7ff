//! Response status codes and their class split.
//!
//! The session layer never interprets individual codes beyond the class
//! (1xx/2xx/3xx/4xx/5xx/6xx) and the special case of 100 Trying, which does
//! not establish dialogs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A SIP response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

/// The six status classes of RFC 3261.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusClass {
    /// 1xx
    Provisional,
    /// 2xx
    Success,
    /// 3xx
    Redirect,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// 6xx
    GlobalError,
}

impl StatusCode {
    pub const TRYING: StatusCode = StatusCode(100);
    pub const RINGING: StatusCode = StatusCode(180);
    pub const OK: StatusCode = StatusCode(200);

    pub fn code(&self) -> u16 {
        self.0
    }

    /// Status class for callback selection and event classification.
    pub fn class(&self) -> StatusClass {
        match self.0 {
            100..=199 => StatusClass::Provisional,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::GlobalError,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.class() == StatusClass::Provisional
    }

    pub fn is_success(&self) -> bool {
        self.class() == StatusClass::Success
    }

    pub fn is_final(&self) -> bool {
        !self.is_provisional()
    }

    /// 100 Trying is informational only and never creates dialog state.
    pub fn is_trying(&self) -> bool {
        self.0 == 100
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_boundaries() {
        assert_eq!(StatusCode(100).class(), StatusClass::Provisional);
        assert_eq!(StatusCode(199).class(), StatusClass::Provisional);
        assert_eq!(StatusCode(200).class(), StatusClass::Success);
        assert_eq!(StatusCode(302).class(), StatusClass::Redirect);
        assert_eq!(StatusCode(486).class(), StatusClass::ClientError);
        assert_eq!(StatusCode(503).class(), StatusClass::ServerError);
        assert_eq!(StatusCode(603).class(), StatusClass::GlobalError);
    }

    #[test]
    fn trying_is_provisional_but_special() {
        assert!(StatusCode::TRYING.is_provisional());
        assert!(StatusCode::TRYING.is_trying());
        assert!(!StatusCode::RINGING.is_trying());
    }
}
