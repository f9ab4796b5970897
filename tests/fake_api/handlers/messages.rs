//! `/api/messages/*` handlers.
//!
//! Message details use the server's nested `content` shape
//! (`{ raw, html, text }`) rather than a flat `rawBody`.

use crate::fake_api::io::Response;
use crate::fake_api::store::{RECEIVED_AT, Store, TestMessage};
use serde_json::{Value, json};

fn raw_message(message: &TestMessage) -> String {
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
        message.from, message.to, message.subject, message.body
    )
}

/// `GET /api/messages/list?mailbox_id=...`
///
/// Unknown mailboxes have an empty list.
pub fn handle_message_list(store: &Store, mailbox_id: &str) -> Response {
    let list: Vec<Value> = store
        .mailbox(mailbox_id)
        .map(|mailbox| {
            mailbox
                .messages
                .iter()
                .map(|message| {
                    json!({
                        "id": message.id,
                        "from": [message.from],
                        "to": [message.to],
                        "subject": message.subject,
                        "receivedAt": RECEIVED_AT,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Response::json(&Value::Array(list))
}

/// `GET /api/messages/details?message_id=...`
pub fn handle_message_details(store: &Store, message_id: &str) -> Response {
    let Some(message) = store.message(message_id) else {
        return Response::empty(404);
    };

    Response::json(&json!({
        "id": message.id,
        "from": [message.from],
        "to": [message.to],
        "subject": message.subject,
        "receivedAt": RECEIVED_AT,
        "content": {
            "raw": raw_message(message),
            "html": null,
            "text": message.body,
        },
    }))
}

/// `POST /api/messages/delete` with form field `message_id`
pub fn handle_message_delete(store: &mut Store, message_id: Option<&str>) -> Response {
    match message_id {
        Some(id) if store.delete_message(id) => Response::empty(200),
        _ => Response::empty(404),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_api::store::StoreBuilder;

    fn store() -> Store {
        StoreBuilder::new()
            .mailbox("m1", "alice")
            .message("a", "First", "x@test", "alice@test", "one")
            .message("b", "Second", "y@test", "alice@test", "two")
            .build()
    }

    #[test]
    fn list_keeps_store_order() {
        let response = handle_message_list(&store(), "m1");
        let body: Value = serde_json::from_str(&response.body).unwrap();
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn unknown_mailbox_lists_nothing() {
        let response = handle_message_list(&store(), "ghost");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[]");
    }

    #[test]
    fn details_nest_raw_content() {
        let response = handle_message_details(&store(), "b");
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert!(
            body["content"]["raw"]
                .as_str()
                .unwrap()
                .contains("Subject: Second")
        );
        assert_eq!(body["content"]["text"], "two");
    }

    #[test]
    fn unknown_message_is_404() {
        assert_eq!(handle_message_details(&store(), "zzz").status, 404);
    }

    #[test]
    fn delete_removes_message() {
        let mut store = store();
        assert_eq!(handle_message_delete(&mut store, Some("a")).status, 200);
        assert_eq!(handle_message_delete(&mut store, Some("a")).status, 404);
        assert!(store.message("a").is_none());
    }
}
