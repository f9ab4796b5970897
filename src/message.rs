//! Message types returned by the messages API

use serde::{Deserialize, Serialize};

/// One row of `GET /api/messages/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from: Vec<String>,
    #[serde(default)]
    pub to: Vec<String>,
    /// Unix timestamp (seconds).
    pub received_at: i64,
}

/// A full message as returned by `GET /api/messages/details`.
///
/// Accepts both the flat `rawBody` field and the server's nested
/// `content: { raw, html, text }` shape. Serializes flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MessageDetailWire")]
pub struct MessageDetail {
    pub id: String,
    pub subject: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub received_at: i64,
    pub raw_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDetailWire {
    id: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    from: Vec<String>,
    #[serde(default)]
    to: Vec<String>,
    received_at: i64,
    raw_body: Option<String>,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    text: Option<String>,
    content: Option<ContentWire>,
}

#[derive(Deserialize)]
struct ContentWire {
    #[serde(default)]
    raw: String,
    html: Option<String>,
    text: Option<String>,
}

impl From<MessageDetailWire> for MessageDetail {
    fn from(wire: MessageDetailWire) -> Self {
        let (content_raw, content_html, content_text) = wire
            .content
            .map_or((None, None, None), |c| (Some(c.raw), c.html, c.text));

        Self {
            id: wire.id,
            subject: wire.subject,
            from: wire.from,
            to: wire.to,
            received_at: wire.received_at,
            raw_body: wire.raw_body.or(content_raw).unwrap_or_default(),
            html: wire.html.or(content_html),
            text: wire.text.or(content_text),
        }
    }
}
