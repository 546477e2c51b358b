//! # Submission Transport
//!
//! The boundary between the configurator and whatever delivers orders and
//! leads (webhook, CRM, mail). The configurator only builds the request;
//! delivery is an implementation of [`OrderTransport`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Session ──snapshot──► SubmissionRequest ──► OrderTransport::deliver    │
//! │                         ├── Order { customer, order }      │            │
//! │                         └── Lead  { webhook_url, order }   │            │
//! │                                                            ▼            │
//! │                                             Ok(()) / TransportError     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use radiosync_core::{CustomerInfo, OrderSnapshot};

// =============================================================================
// Transport Error
// =============================================================================

/// Delivery failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the receiver.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The receiver answered with an error status.
    #[error("Rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// No answer in time.
    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    /// The payload could not be encoded.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

impl TransportError {
    /// Whether sending the same payload again can succeed.
    ///
    /// Client errors (4xx) and encoding failures will fail the same way.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed(_) | TransportError::Timeout(_) => true,
            TransportError::Rejected { status, .. } => *status >= 500 || *status == 429,
            TransportError::SerializationFailed(_) => false,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::SerializationFailed(err.to_string())
    }
}

// =============================================================================
// Submission Request
// =============================================================================

/// What gets delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmissionRequest {
    /// A full order from the order dialog.
    Order {
        customer: CustomerInfo,
        order: OrderSnapshot,
    },
    /// A lead sent to a webhook.
    Lead {
        #[serde(rename = "webhookUrl")]
        webhook_url: String,
        order: OrderSnapshot,
    },
}

impl SubmissionRequest {
    pub fn order(&self) -> &OrderSnapshot {
        match self {
            SubmissionRequest::Order { order, .. } | SubmissionRequest::Lead { order, .. } => order,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionRequest::Order { .. } => "order",
            SubmissionRequest::Lead { .. } => "lead",
        }
    }

    /// JSON body as sent over the wire.
    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Delivers submission requests.
///
/// Implementations must not retry on their own: retry is the outbox's job,
/// so the user sees every failure.
#[async_trait]
pub trait OrderTransport: Send + Sync {
    async fn deliver(&self, request: &SubmissionRequest) -> Result<(), TransportError>;
}

/// Writes the payload to the log. The built-in transport for the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl OrderTransport for LogTransport {
    async fn deliver(&self, request: &SubmissionRequest) -> Result<(), TransportError> {
        let payload = request.to_json()?;
        info!(
            kind = request.kind(),
            order_id = %request.order().id,
            total = %request.order().breakdown.total,
            %payload,
            "Submission delivered"
        );
        Ok(())
    }
}
