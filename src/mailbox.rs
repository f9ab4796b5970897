//! Mailbox types
//!
//! A mailbox is a named container of captured messages. The server
//! always reports an `id`; `name` and `isAnonymous` are optional on the
//! wire. The anonymous mailbox collects mail that was not addressed to
//! any named mailbox and is the default navigation target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mailbox as listed by `GET /api/mailboxes/list`.
///
/// # Examples
///
/// ```
/// use zinktray_client::Mailbox;
///
/// let unlisted = Mailbox::stand_in("ghost");
/// assert_eq!(unlisted.id, "ghost");
/// assert_eq!(unlisted.display_name(), "ghost");
/// assert!(!unlisted.is_anonymous);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Mailbox {
    /// A local mailbox for a name the server did not list.
    ///
    /// Lets the client still display and query a raw mailbox id.
    #[must_use]
    pub fn stand_in(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            is_anonymous: false,
        }
    }

    /// The label shown for this mailbox: its name, or its id when the
    /// server did not resolve a name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Pick the mailbox a navigation to `name` resolves to, falling
    /// back to a [`Mailbox::stand_in`] when nothing in `mailboxes`
    /// matches.
    #[must_use]
    pub fn resolve(mailboxes: &[Self], name: &str) -> Self {
        mailboxes
            .iter()
            .find(|mailbox| mailbox.answers_to(name))
            .cloned()
            .unwrap_or_else(|| Self::stand_in(name))
    }

    /// Whether this mailbox is the one a navigation to `name` refers
    /// to. An empty name selects the anonymous mailbox.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || (name.is_empty() && self.is_anonymous)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
