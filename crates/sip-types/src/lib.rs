//! Structured SIP message types for the sipflow session layer
//!
//! This crate is the narrow interface between the session-layer core
//! (dialog management and transaction state machines in `sipflow-dialog-core`)
//! and its collaborators. The parsing layer produces these structured values
//! from the wire; the transport layer consumes them through the [`Transport`]
//! seam. Wire grammar, SDP semantics and socket handling are explicitly out
//! of scope here.
//!
//! ## Contents
//!
//! - [`Method`]: request method classification (REGISTER, BYE, OPTIONS, ...)
//! - [`StatusCode`] / [`StatusClass`]: response status classification
//! - [`Uri`], [`NameAddr`], [`Contact`]: addressing types; `NameAddr` carries
//!   the optional `tag` parameter used for dialog matching
//! - [`Via`], [`CSeq`]: the header values the session layer reads
//! - [`Request`], [`Response`]: structured messages with chainable setters
//! - [`Transport`]: the async send primitive bound to each transaction

pub mod address;
pub mod headers;
pub mod message;
pub mod method;
pub mod status;
pub mod transport;

pub use address::{Contact, NameAddr, Scheme, Uri};
pub use headers::{CSeq, Via};
pub use message::{Request, Response};
pub use method::Method;
pub use status::{StatusClass, StatusCode};
pub use transport::{Transport, TransportError};
