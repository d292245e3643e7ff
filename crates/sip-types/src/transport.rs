//! The transport seam.
//!
//! Each server transaction is bound to one output channel at creation; the
//! session layer never opens sockets itself. A send failure is fatal to the
//! transaction that attempted it, never to the process.

use thiserror::Error;

use crate::message::Response;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to send to {host}:{port}: {message}")]
    SendFailed {
        host: String,
        port: u16,
        message: String,
    },

    #[error("transport channel is closed")]
    ChannelClosed,
}

/// Async send primitive implemented by the transport layer.
///
/// The session layer treats the send as its single suspension point: state
/// transitions are applied only once the outcome is known.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `response` to the given address, taken by the caller from the
    /// first Via header of the response being (re)transmitted.
    async fn send_response(
        &self,
        response: &Response,
        host: &str,
        port: u16,
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::status::StatusCode;

    #[derive(Debug, Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, u16)>>,
    }

    #[async_trait::async_trait]
    impl Transport for RecordingTransport {
        async fn send_response(
            &self,
            _response: &Response,
            host: &str,
            port: u16,
        ) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push((host.to_string(), port));
            Ok(())
        }
    }

    #[tokio::test]
    async fn sends_go_through_a_trait_object() {
        let transport = Arc::new(RecordingTransport::default());
        let seam: Arc<dyn Transport> = transport.clone();

        let response = Response::new(StatusCode::OK);
        seam.send_response(&response, "198.51.100.1", 5060)
            .await
            .unwrap();

        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[("198.51.100.1".to_string(), 5060)]
        );
    }

    #[test]
    fn send_failure_names_the_target() {
        let error = TransportError::SendFailed {
            host: "10.0.0.1".to_string(),
            port: 5060,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "failed to send to 10.0.0.1:5060: connection refused"
        );
    }
}
