//! zinktray mailbox browser client
//!
//! Browses the mailboxes and messages captured by a zinktray fake
//! SMTP server through its HTTP API. Navigation is driven purely by
//! URL-style hash fragments (`#!/<mailbox>/<message>`), so every view
//! is addressable and any front end only has to feed hash changes into a
//! [`NavigationController`] and display its [`ViewState`].
//!
//! Responses may arrive out of order; the controller guarantees that a
//! superseded navigation never overwrites the view of a newer one.

mod client;
mod config;
pub mod controller;
mod error;
mod mailbox;
mod message;
pub mod router;
mod transport;
pub mod view;

pub use client::{ApiClient, MailApi};
pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use controller::{
    NavigationController, NavigationEvent, NavigationOutcome, Phase,
};
pub use error::{Error, Result};
pub use mailbox::Mailbox;
pub use message::{MessageDetail, MessageSummary};
pub use router::NavigationTarget;
pub use view::ViewState;
