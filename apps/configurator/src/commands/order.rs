//! # Order Commands
//!
//! Order and lead submission. Each command validates the form, freezes the
//! session into an `OrderSnapshot`, and hands it to the outbox.
//!
//! ## Submission Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Submission                                     │
//! │                                                                         │
//! │  "Оформить заказ" ──► submit_order(customer)                            │
//! │                          │                                              │
//! │                          ├── cart empty ──► Error { retryable: false }  │
//! │                          ├── name / email / phone invalid               │
//! │                          │       └──► Error { retryable: false }        │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                   session.snapshot()  (owned, taken before any await)   │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                   outbox.send(transport, request)                       │
//! │                          │                                              │
//! │               ┌──────────┴───────────┐                                  │
//! │               ▼                      ▼                                  │
//! │         Success                 Error { retryable }                     │
//! │         (form reset)            (form kept; retry_submission resends)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here mutates the session.

use tracing::{debug, info};

use radiosync_core::{CustomerInfo, ValidationError};

use crate::config::parse_webhook_url;
use crate::state::{Delivery, Notification, Session, SubmissionOutbox};
use crate::transport::{OrderTransport, SubmissionRequest};

// =============================================================================
// User-facing Messages
// =============================================================================

pub const CART_EMPTY: &str = "Корзина пуста";
pub const ORDER_PLACED: &str = "Заказ успешно оформлен!";
pub const LEAD_SENT: &str = "Заявка успешно отправлена!";
pub const SUBMISSION_FAILED: &str = "Произошла ошибка при отправке заявки.";
pub const NAME_REQUIRED: &str = "Пожалуйста, введите ваше имя";
pub const EMAIL_INVALID: &str = "Пожалуйста, введите корректный email";
pub const PHONE_INVALID: &str = "Пожалуйста, введите корректный номер телефона";
pub const WEBHOOK_REQUIRED: &str = "Пожалуйста, введите URL webhook";
pub const WEBHOOK_INVALID: &str = "Пожалуйста, введите корректный URL webhook";
pub const NOTHING_TO_RETRY: &str = "Нет заявки для повторной отправки";

fn customer_message(err: &ValidationError) -> &'static str {
    match err.field() {
        "name" => NAME_REQUIRED,
        "email" => EMAIL_INVALID,
        _ => PHONE_INVALID,
    }
}

fn webhook_message(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::Required { .. } => WEBHOOK_REQUIRED,
        _ => WEBHOOK_INVALID,
    }
}

fn delivery_notification(delivery: Delivery, success: &'static str) -> Notification {
    match delivery {
        Delivery::Delivered => Notification::success(success),
        Delivery::Failed { will_retry, .. } => Notification::error(SUBMISSION_FAILED, will_retry),
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Submits the order dialog.
///
/// An empty cart is refused before the form is checked, and the outbox is
/// left alone. On success the form is reset to its initial state (empty name
/// and email, phone pre-filled with `+7`). On failure the form is left as
/// typed.
pub async fn submit_order(
    session: &Session,
    outbox: &mut SubmissionOutbox,
    transport: &dyn OrderTransport,
    form: &mut CustomerInfo,
) -> Notification {
    let customer = form.trimmed();
    debug!(name = %customer.name, email = %customer.email, "submit_order command");

    if session.line_items().is_empty() {
        debug!("Order rejected: cart is empty");
        return Notification::error(CART_EMPTY, false);
    }

    if let Err(err) = customer.validate() {
        debug!(error = %err, "Customer info rejected");
        return Notification::error(customer_message(&err), false);
    }

    let order = session.snapshot();
    info!(
        order_id = %order.id,
        total = %order.breakdown.total,
        items = order.items.len(),
        "Submitting order"
    );

    let delivery = outbox
        .send(transport, SubmissionRequest::Order { customer, order })
        .await;

    let notification = delivery_notification(delivery, ORDER_PLACED);
    if notification.is_success() {
        *form = CustomerInfo::default();
    }
    notification
}

/// Sends the current configuration as a lead to a webhook.
///
/// On success the URL field is cleared.
pub async fn send_lead(
    session: &Session,
    outbox: &mut SubmissionOutbox,
    transport: &dyn OrderTransport,
    webhook_url: &mut String,
) -> Notification {
    debug!(webhook_url = %webhook_url, "send_lead command");

    let url = match parse_webhook_url(webhook_url) {
        Ok(url) => url,
        Err(err) => {
            debug!(error = %err, "Webhook URL rejected");
            return Notification::error(webhook_message(&err), false);
        }
    };

    let order = session.snapshot();
    info!(order_id = %order.id, webhook = %url, "Sending lead");

    let delivery = outbox
        .send(
            transport,
            SubmissionRequest::Lead {
                webhook_url: url.to_string(),
                order,
            },
        )
        .await;

    let notification = delivery_notification(delivery, LEAD_SENT);
    if notification.is_success() {
        webhook_url.clear();
    }
    notification
}

/// Resends the last failed submission without re-entering anything.
pub async fn retry_submission(
    outbox: &mut SubmissionOutbox,
    transport: &dyn OrderTransport,
) -> Notification {
    debug!("retry_submission command");

    let success = match outbox.pending() {
        Some(pending) => match pending.request {
            SubmissionRequest::Order { .. } => ORDER_PLACED,
            SubmissionRequest::Lead { .. } => LEAD_SENT,
        },
        None => return Notification::error(NOTHING_TO_RETRY, false),
    };

    match outbox.retry(transport).await {
        Some(delivery) => delivery_notification(delivery, success),
        None => Notification::error(NOTHING_TO_RETRY, false),
    }
}
