//! Server transaction state machines.
//!
//! Only the non-INVITE kind is implemented here; the INVITE server machine
//! (RFC 3261 Section 17.2.1) would slot in beside it with its own handler
//! tags and transition table over the same engine.

pub mod non_invite;
