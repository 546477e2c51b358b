//! # Submission Outbox
//!
//! Holds the one submission that failed and can be retried without the user
//! re-entering anything.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  send(request) ──► deliver ──► Ok ───────────────► Success, outbox empty│
//! │                       │                                                 │
//! │                       └──► Err (retryable) ──────► Error, payload kept  │
//! │                       │                              │                  │
//! │                       │                              ▼                  │
//! │                       │                      retry() ──► deliver ...    │
//! │                       │                                                 │
//! │                       └──► Err (fatal or attempts exhausted)            │
//! │                                            ──────► Error, outbox empty  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The outbox never touches the session: it owns the snapshot it was given.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::transport::{OrderTransport, SubmissionRequest, TransportError};

/// Default number of delivery attempts before a payload is dropped.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// User-facing outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Success { message: String },
    Error { message: String, retryable: bool },
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification::Success {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>, retryable: bool) -> Self {
        Notification::Error {
            message: message.into(),
            retryable,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message } | Notification::Error { message, .. } => message,
        }
    }
}

/// A request waiting for another delivery attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSubmission {
    pub request: SubmissionRequest,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub queued_at: DateTime<Utc>,
}

/// Outcome of one delivery attempt, before it is turned into a notification.
#[derive(Debug)]
pub enum Delivery {
    Delivered,
    Failed {
        error: TransportError,
        will_retry: bool,
    },
}

/// Single-slot outbox. A new submission replaces whatever was pending.
#[derive(Debug)]
pub struct SubmissionOutbox {
    pending: Option<PendingSubmission>,
    max_attempts: u32,
}

impl SubmissionOutbox {
    pub fn new(max_attempts: u32) -> Self {
        SubmissionOutbox {
            pending: None,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn pending(&self) -> Option<&PendingSubmission> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delivers a fresh request, replacing any pending one.
    pub async fn send(
        &mut self,
        transport: &dyn OrderTransport,
        request: SubmissionRequest,
    ) -> Delivery {
        if let Some(dropped) = self.pending.take() {
            info!(
                kind = dropped.request.kind(),
                order_id = %dropped.request.order().id,
                "Replacing pending submission"
            );
        }

        self.attempt(
            transport,
            PendingSubmission {
                request,
                attempts: 0,
                last_error: None,
                queued_at: Utc::now(),
            },
        )
        .await
    }

    /// Delivers the pending request again. `None` when nothing is pending.
    pub async fn retry(&mut self, transport: &dyn OrderTransport) -> Option<Delivery> {
        let pending = self.pending.take()?;
        Some(self.attempt(transport, pending).await)
    }

    async fn attempt(
        &mut self,
        transport: &dyn OrderTransport,
        mut pending: PendingSubmission,
    ) -> Delivery {
        pending.attempts += 1;

        match transport.deliver(&pending.request).await {
            Ok(()) => {
                info!(
                    kind = pending.request.kind(),
                    order_id = %pending.request.order().id,
                    attempts = pending.attempts,
                    "Submission sent"
                );
                Delivery::Delivered
            }
            Err(error) => {
                let will_retry = error.is_retryable() && pending.attempts < self.max_attempts;

                warn!(
                    kind = pending.request.kind(),
                    order_id = %pending.request.order().id,
                    attempts = pending.attempts,
                    max_attempts = self.max_attempts,
                    will_retry,
                    error = %error,
                    "Submission failed"
                );

                if will_retry {
                    pending.last_error = Some(error.to_string());
                    self.pending = Some(pending);
                }

                Delivery::Failed { error, will_retry }
            }
        }
    }
}

impl Default for SubmissionOutbox {
    fn default() -> Self {
        SubmissionOutbox::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use radiosync_core::{Catalog, Configuration, CustomerInfo, OrderSnapshot, PromoTable};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted outcomes, then succeeds.
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<(), TransportError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<(), TransportError>>) -> Self {
            ScriptedTransport {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl OrderTransport for ScriptedTransport {
        async fn deliver(&self, _request: &SubmissionRequest) -> Result<(), TransportError> {
            *self.calls.lock().unwrap() += 1;
            self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    fn request() -> SubmissionRequest {
        let mut config = Configuration::new();
        config.set_transmitter_qty(1).unwrap();
        SubmissionRequest::Order {
            customer: CustomerInfo::new("Иван", "ivan@example.ru", "+79001234567"),
            order: OrderSnapshot::capture(&config, &Catalog::standard(), &PromoTable::standard()),
        }
    }

    fn offline() -> TransportError {
        TransportError::ConnectionFailed("offline".into())
    }

    #[tokio::test]
    async fn test_success_leaves_outbox_empty() {
        let transport = ScriptedTransport::new(vec![]);
        let mut outbox = SubmissionOutbox::default();

        let delivery = outbox.send(&transport, request()).await;
        assert!(matches!(delivery, Delivery::Delivered));
        assert!(!outbox.has_pending());
    }

    #[tokio::test]
    async fn test_retryable_failure_keeps_payload() {
        let transport = ScriptedTransport::new(vec![Err(offline())]);
        let mut outbox = SubmissionOutbox::default();

        let delivery = outbox.send(&transport, request()).await;
        assert!(matches!(delivery, Delivery::Failed { will_retry: true, .. }));

        let pending = outbox.pending().unwrap();
        assert_eq!(pending.attempts, 1);
        assert_eq!(pending.last_error.as_deref(), Some("Connection failed: offline"));

        let order_id = pending.request.order().id.clone();
        let retried = outbox.retry(&transport).await.unwrap();
        assert!(matches!(retried, Delivery::Delivered));
        assert!(!outbox.has_pending());
        assert_eq!(transport.calls(), 2);
        assert!(!order_id.is_empty());
    }

    #[tokio::test]
    async fn test_retry_resends_same_snapshot() {
        let transport = ScriptedTransport::new(vec![Err(offline()), Err(offline())]);
        let mut outbox = SubmissionOutbox::default();

        outbox.send(&transport, request()).await;
        let first_id = outbox.pending().unwrap().request.order().id.clone();

        outbox.retry(&transport).await.unwrap();
        let pending = outbox.pending().unwrap();
        assert_eq!(pending.request.order().id, first_id);
        assert_eq!(pending.attempts, 2);
    }

    #[tokio::test]
    async fn test_client_error_is_dropped() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Rejected {
            status: 422,
            body: "bad payload".into(),
        })]);
        let mut outbox = SubmissionOutbox::default();

        let delivery = outbox.send(&transport, request()).await;
        assert!(matches!(delivery, Delivery::Failed { will_retry: false, .. }));
        assert!(!outbox.has_pending());
    }

    #[tokio::test]
    async fn test_attempts_exhausted() {
        let transport = ScriptedTransport::new(vec![Err(offline()), Err(offline())]);
        let mut outbox = SubmissionOutbox::new(2);

        outbox.send(&transport, request()).await;
        assert!(outbox.has_pending());

        let delivery = outbox.retry(&transport).await.unwrap();
        assert!(matches!(delivery, Delivery::Failed { will_retry: false, .. }));
        assert!(!outbox.has_pending());
    }

    #[tokio::test]
    async fn test_retry_with_nothing_pending() {
        let transport = ScriptedTransport::new(vec![]);
        let mut outbox = SubmissionOutbox::default();

        assert!(outbox.retry(&transport).await.is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_notification_serialization() {
        let json = serde_json::to_value(Notification::error("Сбой", true)).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["retryable"], true);

        let json = serde_json::to_value(Notification::success("Готово")).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["message"], "Готово");
    }
}
