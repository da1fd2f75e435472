//! # notify-transport
//!
//! Notification channel transports - low-level delivery capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to deliver:
//! - Email via a mail provider's HTTP API (Mailgun-compatible form POST)
//! - Messaging (WhatsApp-style) behind the same narrow contract
//!
//! Business logic (WHAT to send, WHEN, and to WHOM) stays in application
//! code: message rendering, channel selection and attempt logging all live
//! in backoffice-server.
//!
//! The shipped [`LoggingMessenger`] is a stub: the messaging provider
//! integration is out of scope, but the trait contract is identical to a
//! real provider's, so swapping one in requires no dispatcher changes.
//!
//! ## Example
//!
//! ```ignore
//! use notify_transport::{EmailTransport, HttpMailer, MailerConfig};
//!
//! let mailer = HttpMailer::new(MailerConfig {
//!     api_url: "https://api.mailgun.net/v3/mg.example.nl".into(),
//!     api_key: "key-***".into(),
//!     from: "Bestellingen <bestellingen@example.nl>".into(),
//! })?;
//! mailer.send("klant@example.nl", "Update van uw bestelling", "...").await?;
//! ```

mod email;
mod error;
mod messaging;

pub use email::{EmailTransport, HttpMailer, LoggingMailer, MailerConfig};
pub use error::{TransportError, TransportResult};
pub use messaging::{LoggingMessenger, MessageTransport};
