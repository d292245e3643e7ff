//! Core dialog types and functionality
//!
//! A dialog is the persistent call context between two user agents, created
//! from a dialog-establishing response to INVITE and consulted for every
//! in-dialog request and response afterwards:
//!
//! - [`DialogId`]: unique UUID-based identifier
//! - [`Dialog`]: the entity itself, with UAC/UAS constructors and the four
//!   in-dialog update operations
//! - [`DialogState`]: lifecycle states (Early, Confirmed, Closed)
//! - [`DialogRole`]: whether the local side initiated the dialog
//!
//! Matching of incoming messages against a candidate dialog (including the
//! RFC 2543 no-tag fallback) lives in the [`matching`] module.

pub mod dialog_id;
pub mod dialog_impl;
pub mod dialog_state;
pub mod matching;

pub use dialog_id::DialogId;
pub use dialog_impl::{Dialog, DialogRole};
pub use dialog_state::DialogState;
