//! View model and render instructions
//!
//! Rendering is split in two halves. The `show_*` functions are pure:
//! they turn data into a list of [`RenderOp`]s. [`ViewState::apply`]
//! executes those instructions against the in-memory view, which a
//! front end (the CLI prints [`ViewState::render_text`]) then displays.
//!
//! The view has three regions, each replaced wholesale by the ops that
//! target it, so applying the same ops twice leaves the same state:
//!
//! - the mailbox label
//! - the message list (loading, empty, populated or failed)
//! - the detail pane (placeholder or one message)

use crate::mailbox::Mailbox;
use crate::message::{MessageDetail, MessageSummary};
use crate::router;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Write as _;

/// Text of the detail pane when no message is open.
pub const PLACEHOLDER: &str = "Select message first.";

/// Shown in place of an empty subject.
pub const NO_SUBJECT: &str = "<No subject>";

/// One entry of the rendered message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: String,
    pub subject: String,
    pub to: Vec<String>,
    pub received_at: i64,
    /// Hash fragment that opens this message.
    pub href: String,
    pub selected: bool,
}

/// The message list region. Exactly one state is visible at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "entries", rename_all = "camelCase")]
pub enum MessageList {
    #[default]
    Loading,
    Empty,
    Populated(Vec<ListEntry>),
    Failed(String),
}

/// The detail pane region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum DetailPane {
    #[default]
    Placeholder,
    Message(Box<MessageDetail>),
}

/// A single mutation of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    SetMailboxLabel(String),
    ShowListLoading,
    ShowListEmpty,
    ShowListEntries(Vec<ListEntry>),
    ShowListFailure(String),
    /// Clear every highlight, then highlight the entry with this id.
    HighlightMessage(Option<String>),
    ShowMessage(Box<MessageDetail>),
    ShowPlaceholder,
}

/// What the user currently sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    label: String,
    list: MessageList,
    detail: DetailPane,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn list(&self) -> &MessageList {
        &self.list
    }

    #[must_use]
    pub const fn detail(&self) -> &DetailPane {
        &self.detail
    }

    /// Entries of the list when it is populated, otherwise nothing.
    #[must_use]
    pub fn entries(&self) -> &[ListEntry] {
        match &self.list {
            MessageList::Populated(entries) => entries,
            _ => &[],
        }
    }

    /// Id of the highlighted list entry, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<&str> {
        self.entries()
            .iter()
            .find(|entry| entry.selected)
            .map(|entry| entry.id.as_str())
    }

    /// Execute render instructions in order.
    pub fn apply(&mut self, ops: impl IntoIterator<Item = RenderOp>) {
        for op in ops {
            self.apply_one(op);
        }
    }

    fn apply_one(&mut self, op: RenderOp) {
        match op {
            RenderOp::SetMailboxLabel(label) => self.label = label,
            RenderOp::ShowListLoading => self.list = MessageList::Loading,
            RenderOp::ShowListEmpty => self.list = MessageList::Empty,
            RenderOp::ShowListEntries(entries) => {
                self.list = MessageList::Populated(entries);
            }
            RenderOp::ShowListFailure(reason) => {
                self.list = MessageList::Failed(reason);
            }
            RenderOp::HighlightMessage(id) => {
                if let MessageList::Populated(entries) = &mut self.list {
                    for entry in entries {
                        entry.selected =
                            id.as_deref() == Some(entry.id.as_str());
                    }
                }
            }
            RenderOp::ShowMessage(message) => {
                self.detail = DetailPane::Message(message);
            }
            RenderOp::ShowPlaceholder => self.detail = DetailPane::Placeholder,
        }
    }

    /// Plain-text rendering for terminals.
    ///
    /// The raw body is printed as-is, never interpreted.
    #[must_use]
    pub fn render_text(&self, today: NaiveDate) -> String {
        let mut out = String::new();
        let rule = "-".repeat(60);

        let _ = writeln!(out, "Mailbox: {}", self.label);
        let _ = writeln!(out, "{rule}");

        match &self.list {
            MessageList::Loading => out.push_str("Loading messages...\n"),
            MessageList::Empty => out.push_str("No messages.\n"),
            MessageList::Failed(reason) => {
                let _ = writeln!(out, "Cannot load mailbox: {reason}");
            }
            MessageList::Populated(entries) => {
                for entry in entries {
                    let marker = if entry.selected { '>' } else { ' ' };
                    let _ = writeln!(
                        out,
                        "{marker} {:<40} {:>8}  {}",
                        display_subject(&entry.subject),
                        format_date(entry.received_at, today),
                        entry.href,
                    );
                    let _ = writeln!(out, "  To: {}", entry.to.join(", "));
                }
            }
        }

        let _ = writeln!(out, "{rule}");

        match &self.detail {
            DetailPane::Placeholder => {
                let _ = writeln!(out, "{PLACEHOLDER}");
            }
            DetailPane::Message(message) => {
                let subject = display_subject(&message.subject);
                let _ = writeln!(out, "Subject: {subject}");
                let _ = writeln!(out, "From:    {}", message.from.join(", "));
                let _ = writeln!(out, "To:      {}", message.to.join(", "));
                let date = format_date(message.received_at, today);
                let _ = writeln!(out, "Date:    {date}");
                out.push('\n');
                out.push_str(&message.raw_body);
                if !message.raw_body.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        out
    }
}

/// Replace the mailbox label.
#[must_use]
pub fn show_mailbox_label(mailbox: &Mailbox) -> Vec<RenderOp> {
    vec![RenderOp::SetMailboxLabel(mailbox.display_name().to_string())]
}

#[must_use]
pub fn show_message_list_loading() -> Vec<RenderOp> {
    vec![RenderOp::ShowListLoading]
}

/// Replace the message list with `messages`, linking each entry to
/// `owner` and highlighting `selected`.
#[must_use]
pub fn show_message_list(
    messages: &[MessageSummary],
    owner: &str,
    selected: Option<&str>,
) -> Vec<RenderOp> {
    if messages.is_empty() {
        return vec![RenderOp::ShowListEmpty];
    }

    let entries = messages
        .iter()
        .map(|message| ListEntry {
            id: message.id.clone(),
            subject: message.subject.clone(),
            to: message.to.clone(),
            received_at: message.received_at,
            href: router::format(Some(owner), Some(&message.id)),
            selected: selected == Some(message.id.as_str()),
        })
        .collect();

    vec![RenderOp::ShowListEntries(entries)]
}

/// Move the highlight to `message_id`. Ids not in the list clear it.
#[must_use]
pub fn set_selected_message_highlight(
    message_id: Option<&str>,
) -> Vec<RenderOp> {
    vec![RenderOp::HighlightMessage(message_id.map(str::to_string))]
}

#[must_use]
pub fn show_message_detail(message: &MessageDetail) -> Vec<RenderOp> {
    vec![RenderOp::ShowMessage(Box::new(message.clone()))]
}

#[must_use]
pub fn show_no_message_selected() -> Vec<RenderOp> {
    vec![RenderOp::ShowPlaceholder]
}

/// Put the list into its failure state and close any open message.
#[must_use]
pub fn show_mailbox_failure(reason: &str) -> Vec<RenderOp> {
    vec![
        RenderOp::ShowListFailure(reason.to_string()),
        RenderOp::ShowPlaceholder,
    ]
}

/// The current date in UTC, the zone [`format_date`] reads
/// timestamps in.
#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Short receive-time label: `D.MM` within `today`'s year, `D.MM.YY`
/// otherwise. Timestamps are read in UTC.
#[must_use]
pub fn format_date(timestamp: i64, today: NaiveDate) -> String {
    let Some(date) = DateTime::from_timestamp(timestamp, 0) else {
        return timestamp.to_string();
    };

    if date.year() == today.year() {
        date.format("%-d.%m").to_string()
    } else {
        date.format("%-d.%m.%y").to_string()
    }
}

const fn display_subject(subject: &str) -> &str {
    if subject.is_empty() { NO_SUBJECT } else { subject }
}
