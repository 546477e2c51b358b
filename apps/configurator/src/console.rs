//! # Console Driver
//!
//! Line-oriented front end for the configurator. Each input line is one
//! command; each command prints one JSON document to stdout.
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  show                              current configuration and breakdown  │
//! │  zone <moscow|rf|world>                                                 │
//! │  set <field> [value]               field: transmitter, receiver,        │
//! │                                    microphone, headphones,              │
//! │                                    headphones_type, charger, promo,     │
//! │                                    vat_rate, vat_included, bundles      │
//! │  cart                              same as show                         │
//! │  cart update <item> <qty>          item: transmitter, receiver,         │
//! │  cart inc <item>                         microphone, headphones,        │
//! │  cart dec <item>                         charger                        │
//! │  cart remove <item>                                                     │
//! │  cart clear                                                             │
//! │  order <name>|<email>|<phone>      submit the order dialog              │
//! │  lead [url]                        send a lead (default: config URL)    │
//! │  retry                             resend the last failed submission    │
//! │  pending                           show the outbox                      │
//! │  help                                                                   │
//! │  quit                                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `set` with no value passes an empty field, exactly like clearing the
//! input in the form.

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use radiosync_core::CustomerInfo;

use crate::commands::{self, ConfiguratorResponse};
use crate::error::ApiError;
use crate::state::{Notification, PendingSubmission, Session, SubmissionOutbox};
use crate::transport::OrderTransport;

const HELP: &str = "show | zone <z> | set <field> [value] | cart [update|inc|dec|remove|clear] \
                    | order <name>|<email>|<phone> | lead [url] | retry | pending | quit";

/// What a command prints.
#[derive(Debug, Serialize)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum Output {
    State(ConfiguratorResponse),
    Notification(Notification),
    Pending { pending: Option<PendingSubmission> },
    Help { usage: &'static str },
    Error(ApiError),
}

/// The console's state: the session plus what the dialogs hold.
pub struct Console {
    session: Session,
    outbox: SubmissionOutbox,
    transport: Arc<dyn OrderTransport>,
    customer_form: CustomerInfo,
    webhook_url: String,
    default_webhook: Option<String>,
}

impl Console {
    pub fn new(session: Session, outbox: SubmissionOutbox, transport: Arc<dyn OrderTransport>) -> Self {
        Console {
            session,
            outbox,
            transport,
            customer_form: CustomerInfo::default(),
            webhook_url: String::new(),
            default_webhook: None,
        }
    }

    /// URL used by `lead` when none is typed.
    pub fn with_default_webhook(mut self, url: Option<String>) -> Self {
        self.default_webhook = url;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn outbox(&self) -> &SubmissionOutbox {
        &self.outbox
    }

    /// Runs one input line. `None` means the user asked to quit.
    pub async fn execute(&mut self, line: &str) -> Option<Output> {
        let line = line.trim();
        let (command, rest) = split_word(line);
        debug!(command, "Console command");

        let output = match command {
            "" | "show" => Ok(Output::State(commands::configuration::get_configuration(
                &self.session,
            ))),
            "quit" | "exit" => return None,
            "help" => Ok(Output::Help { usage: HELP }),
            "zone" => Ok(Output::State(commands::configuration::set_delivery_zone(
                &mut self.session,
                rest,
            ))),
            "set" => self.set_field(rest),
            "cart" => self.cart(rest),
            "order" => self.order(rest).await,
            "lead" => {
                self.webhook_url = match (rest, &self.default_webhook) {
                    ("", Some(default)) => default.clone(),
                    (typed, _) => typed.to_string(),
                };
                let notification = commands::order::send_lead(
                    &self.session,
                    &mut self.outbox,
                    self.transport.as_ref(),
                    &mut self.webhook_url,
                )
                .await;
                Ok(Output::Notification(notification))
            }
            "retry" => {
                let notification =
                    commands::order::retry_submission(&mut self.outbox, self.transport.as_ref())
                        .await;
                Ok(Output::Notification(notification))
            }
            "pending" => Ok(Output::Pending {
                pending: self.outbox.pending().cloned(),
            }),
            other => Err(ApiError::not_found("Command", other)),
        };

        Some(output.unwrap_or_else(Output::Error))
    }

    fn set_field(&mut self, args: &str) -> Result<Output, ApiError> {
        use commands::configuration as cfg;

        let (field, value) = split_word(args);
        let session = &mut self.session;

        let response = match field {
            "transmitter" => cfg::set_transmitter_qty(session, value),
            "receiver" => cfg::set_receiver_qty(session, value),
            "microphone" => cfg::set_microphone_qty(session, value),
            "headphones" => cfg::set_headphones_qty(session, value),
            "headphones_type" => cfg::set_headphones_type(session, value),
            "charger" => cfg::set_charger_variant(session, value),
            "promo" => cfg::set_promo_code(session, value),
            "vat_rate" => cfg::set_vat_rate(session, value),
            "vat_included" => cfg::set_vat_included(session, parse_flag(value)?),
            "bundles" => cfg::set_bundle_count(session, value),
            "" => return Err(ApiError::validation("usage: set <field> [value]")),
            other => return Err(ApiError::not_found("Field", other)),
        };

        Ok(Output::State(response))
    }

    fn cart(&mut self, args: &str) -> Result<Output, ApiError> {
        use commands::cart;

        let (action, rest) = split_word(args);
        let (item, rest) = split_word(rest);
        let session = &mut self.session;

        let response = match action {
            "" | "show" => cart::get_cart(session),
            "update" => {
                let quantity = rest
                    .parse::<i64>()
                    .map_err(|_| ApiError::validation("usage: cart update <item> <qty>"))?;
                cart::update_cart_item(session, item, quantity)
            }
            "inc" => cart::increment_cart_item(session, item),
            "dec" => cart::decrement_cart_item(session, item),
            "remove" => cart::remove_from_cart(session, item),
            "clear" => cart::clear_cart(session),
            other => return Err(ApiError::not_found("Cart action", other)),
        };

        Ok(Output::State(response))
    }

    async fn order(&mut self, args: &str) -> Result<Output, ApiError> {
        let mut fields = args.splitn(3, '|');
        let (name, email, phone) = match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(email), Some(phone)) => (name, email, phone),
            _ => return Err(ApiError::validation("usage: order <name>|<email>|<phone>")),
        };
        self.customer_form = CustomerInfo::new(name, email, phone);

        let notification = commands::order::submit_order(
            &self.session,
            &mut self.outbox,
            self.transport.as_ref(),
            &mut self.customer_form,
        )
        .await;

        Ok(Output::Notification(notification))
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], input[at..].trim()),
        None => (input, ""),
    }
}

fn parse_flag(value: &str) -> Result<bool, ApiError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "да" => Ok(true),
        "false" | "no" | "off" | "0" | "нет" => Ok(false),
        other => Err(ApiError::validation(format!(
            "vat_included must be true or false, got '{}'",
            other
        ))),
    }
}

/// Reads commands from `input` until EOF or `quit`, writing JSON to `output`.
pub async fn run_loop<R, W>(console: &mut Console, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let Some(result) = console.execute(&line).await else {
            break;
        };

        let json = serde_json::to_string(&result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        output.write_all(json.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    info!(session_id = %console.session().id(), "Console closed");
    Ok(())
}
