//! In-process fake zinktray API server for integration testing
//!
//! # Request handling
//!
//! The server speaks just enough HTTP/1.1 for reqwest:
//!
//! ```text
//!   Client connects via TCP
//!       |
//!   Request line:  GET /api/messages/list?mailbox_id=abc HTTP/1.1
//!   Headers, ending with an empty line (Content-Length is honoured)
//!   Body (form-encoded, POST only)
//!       |
//!   Server answers with a JSON body and `Connection: close`
//! ```
//!
//! One request per connection. Faults configured on the `Store`
//! (failing paths, malformed bodies, delayed message lists) are applied
//! before the regular handler runs.

use super::handlers::{
    handle_mailbox_delete, handle_mailbox_list, handle_message_delete, handle_message_details,
    handle_message_list,
};
use super::io::{Response, write_response};
use super::store::Store;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A parsed HTTP request.
struct Request {
    method: String,
    path: String,
    params: HashMap<String, String>,
}

/// A fake API server that runs on localhost with an OS-assigned port.
pub struct FakeApiServer {
    port: u16,
    store: Arc<Mutex<Store>>,
    /// Accept loop, aborted when the server is dropped.
    handle: tokio::task::JoinHandle<()>,
}

impl FakeApiServer {
    /// Start a new fake server with the given state.
    ///
    /// Binds to `127.0.0.1:0` and spawns a tokio task that accepts
    /// connections until the `FakeApiServer` is dropped.
    pub async fn start(store: Store) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();
        let store = Arc::new(Mutex::new(store));

        let shared = store.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _addr)) = listener.accept().await else {
                    break;
                };
                let store = shared.clone();
                tokio::spawn(async move {
                    handle_connection(stream, &store).await;
                });
            }
        });

        Self {
            port,
            store,
            handle,
        }
    }

    /// Base URL to configure clients with.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Snapshot of the current server state.
    pub fn store(&self) -> Store {
        self.store.lock().unwrap().clone()
    }
}

impl Drop for FakeApiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(stream: TcpStream, store: &Mutex<Store>) {
    let mut reader = BufReader::new(stream);

    let Some(request) = read_request(&mut reader).await else {
        return;
    };

    if let Some(delay) = list_delay(&request, store) {
        tokio::time::sleep(delay).await;
    }

    let response = dispatch(&request, store);
    let _ = write_response(reader.get_mut(), &response).await;
}

/// Configured delay for a message-list request, if any.
fn list_delay(request: &Request, store: &Mutex<Store>) -> Option<Duration> {
    if request.path != "/api/messages/list" {
        return None;
    }
    let id = request.params.get("mailbox_id")?;
    store.lock().unwrap().delays.get(id).copied()
}

/// Read the request line, headers and (for POST) the form body.
async fn read_request(reader: &mut BufReader<TcpStream>) -> Option<Request> {
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;

    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await.ok()? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;

    let url = Url::parse(&format!("http://fake{target}")).ok()?;
    let mut params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if !body.is_empty() {
        let body = String::from_utf8_lossy(&body);
        let form = Url::parse(&format!("http://fake/?{body}")).ok()?;
        params.extend(form.query_pairs().into_owned());
    }

    Some(Request {
        method,
        path: url.path().to_string(),
        params,
    })
}

/// Route a request to its handler, applying configured faults first.
fn dispatch(request: &Request, store: &Mutex<Store>) -> Response {
    let mut store = store.lock().unwrap();

    if store.failing.contains(&request.path) {
        return Response::empty(500);
    }
    if store.malformed.contains(&request.path) {
        return Response::raw(200, "{this is not json");
    }

    let param = |key: &str| request.params.get(key).map(String::as_str);

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/mailboxes/list") => handle_mailbox_list(&store),
        ("POST", "/api/mailboxes/delete") => handle_mailbox_delete(&mut store, param("mailbox_id")),
        ("GET", "/api/messages/list") => {
            handle_message_list(&store, param("mailbox_id").unwrap_or_default())
        }
        ("GET", "/api/messages/details") => {
            handle_message_details(&store, param("message_id").unwrap_or_default())
        }
        ("POST", "/api/messages/delete") => handle_message_delete(&mut store, param("message_id")),
        (_, "/api/mailboxes/delete" | "/api/messages/delete") => Response::empty(405),
        _ => Response::empty(404),
    }
}
