//! # State Module
//!
//! Owned application state for the configurator.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Console / UI driver                        │   │
//! │  │  let mut session = Session::from_app_config(&app)?;             │   │
//! │  │  let mut outbox  = SubmissionOutbox::new(max_attempts);         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │               ┌──────────────┴──────────────┐                           │
//! │               ▼                             ▼                           │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────┐        │
//! │  │   Session                │  │   SubmissionOutbox           │        │
//! │  │                          │  │                              │        │
//! │  │  Configuration           │  │  PendingSubmission           │        │
//! │  │  Arc<Catalog>            │  │  (request, attempts,         │        │
//! │  │  Arc<PromoTable>         │  │   last_error)                │        │
//! │  │  Breakdown               │  │                              │        │
//! │  └──────────────────────────┘  └──────────────────────────────┘        │
//! │                                                                         │
//! │  OWNERSHIP:                                                            │
//! │  • Session: mutated through &mut, breakdown recomputed synchronously   │
//! │  • Catalog / PromoTable: read-only after load, shared by Arc           │
//! │  • Outbox: owns snapshots only, never borrows the session              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;
mod submission;

pub use session::Session;
pub use submission::{
    Delivery, Notification, PendingSubmission, SubmissionOutbox, DEFAULT_MAX_ATTEMPTS,
};
