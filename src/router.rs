//! Hash-fragment routing
//!
//! The location hash encodes the current selection:
//!
//! ```text
//!   #                              home (anonymous mailbox)
//!   #!/<mailbox>                   one mailbox
//!   #!/<mailbox>/<message>         one message inside a mailbox
//! ```
//!
//! Each segment is percent-encoded on its own, so names containing `/`
//! or `#` survive the trip. Anything with more than two segments is not
//! a valid route and is treated as home.

use std::borrow::Cow;

/// Prefix of every non-empty route.
pub const ROUTE_PREFIX: &str = "#!/";

/// Hash of the empty target.
pub const HOME: &str = "#";

/// The (mailbox, message) selection a hash fragment points at.
///
/// A message id only exists together with a mailbox name; the
/// constructors make the other combination unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NavigationTarget {
    mailbox_name: Option<String>,
    message_id: Option<String>,
}

impl NavigationTarget {
    /// The home target: no mailbox, no message.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            mailbox_name: None,
            message_id: None,
        }
    }

    #[must_use]
    pub fn mailbox(name: impl Into<String>) -> Self {
        Self {
            mailbox_name: Some(name.into()),
            message_id: None,
        }
    }

    #[must_use]
    pub fn message(
        mailbox_name: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            mailbox_name: Some(mailbox_name.into()),
            message_id: Some(message_id.into()),
        }
    }

    #[must_use]
    pub fn mailbox_name(&self) -> Option<&str> {
        self.mailbox_name.as_deref()
    }

    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mailbox_name.is_none()
    }

    /// Percent-decode both segments.
    ///
    /// [`parse`] keeps segments exactly as they appear in the hash;
    /// identifiers must go through this before use. A segment that
    /// does not decode to UTF-8 is kept verbatim.
    #[must_use]
    pub fn decoded(&self) -> Self {
        Self {
            mailbox_name: self.mailbox_name.as_deref().map(decode_segment),
            message_id: self.message_id.as_deref().map(decode_segment),
        }
    }

    /// Serialize this target back into a hash fragment.
    #[must_use]
    pub fn to_hash(&self) -> String {
        format(self.mailbox_name(), self.message_id())
    }
}

/// Parse a location hash into a (still percent-encoded) target.
///
/// # Examples
///
/// ```
/// use zinktray_client::router::{self, NavigationTarget};
///
/// let target = router::parse("#!/inbox/42");
/// assert_eq!(target, NavigationTarget::message("inbox", "42"));
/// assert_eq!(router::parse("#!/a/b/c"), router::parse("#"));
/// ```
#[must_use]
pub fn parse(hash: &str) -> NavigationTarget {
    let Some(path) = hash.strip_prefix(ROUTE_PREFIX) else {
        return NavigationTarget::empty();
    };

    let mut segments = path.splitn(3, '/');
    let mailbox_name = segments.next().map(str::to_string);
    let message_id = segments.next().map(str::to_string);

    if segments.next().is_some() {
        return NavigationTarget::empty();
    }

    NavigationTarget {
        mailbox_name,
        message_id,
    }
}

/// Build the hash fragment for a selection.
///
/// A message id without a mailbox has no route and yields [`HOME`].
#[must_use]
pub fn format(mailbox_name: Option<&str>, message_id: Option<&str>) -> String {
    match (mailbox_name, message_id) {
        (None, _) => HOME.to_string(),
        (Some(mailbox), None) => {
            format!("{ROUTE_PREFIX}{}", urlencoding::encode(mailbox))
        }
        (Some(mailbox), Some(message)) => format!(
            "{ROUTE_PREFIX}{}/{}",
            urlencoding::encode(mailbox),
            urlencoding::encode(message)
        ),
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map_or_else(|_| segment.to_string(), Cow::into_owned)
}
