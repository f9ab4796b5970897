//! Shared HTTP request helpers
//!
//! Provides the low-level GET/POST functions used by every operation
//! on `ApiClient`. One request per call: no retry, no caching, no
//! timeout beyond reqwest's defaults.

use crate::error::{Error, Result};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Build the HTTP client shared by all requests of one `ApiClient`.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("zinktray-client/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Network(format!("Cannot build HTTP client: {e}")))
}

/// GET `url` and decode the JSON body.
///
/// Transport failures and non-2xx statuses are [`Error::Network`]
/// (404 is [`Error::NotFound`]); a body that is not the expected JSON
/// is [`Error::Parse`].
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
) -> Result<T> {
    debug!("GET {}", url);

    let response = client.get(url.clone()).send().await?;
    let response = check_status(response, &url)?;
    let body = response.bytes().await?;

    serde_json::from_slice(&body)
        .map_err(|e| Error::Parse(format!("{url}: {e}")))
}

/// POST a single form field to `url`, ignoring the response body.
pub async fn post_form(
    client: &Client,
    url: Url,
    field: &str,
    value: &str,
) -> Result<()> {
    debug!("POST {} ({}={})", url, field, value);

    let response = client
        .post(url.clone())
        .form(&[(field, value)])
        .send()
        .await?;
    check_status(response, &url)?;
    Ok(())
}

fn check_status(response: Response, url: &Url) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(Error::NotFound(url.to_string())),
        status => Err(Error::Network(format!("{url} returned {status}"))),
    }
}
