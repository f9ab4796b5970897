//! zinktray HTTP API client

use crate::config::ApiConfig;
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::message::{MessageDetail, MessageSummary};
use crate::transport;
use reqwest::{Client, Url};
use std::future::Future;
use tracing::info;

/// Read access to mailboxes and messages.
///
/// The navigation controller only talks to the server through this
/// trait, so tests can script response order.
pub trait MailApi {
    /// `GET /api/mailboxes/list`
    fn list_mailboxes(&self) -> impl Future<Output = Result<Vec<Mailbox>>>;

    /// `GET /api/messages/list?mailbox_id=...`
    fn list_messages(
        &self,
        mailbox_id: &str,
    ) -> impl Future<Output = Result<Vec<MessageSummary>>>;

    /// `GET /api/messages/details?message_id=...`
    fn get_message_detail(
        &self,
        message_id: &str,
    ) -> impl Future<Output = Result<MessageDetail>>;

    /// `POST /api/messages/delete`
    fn delete_message(
        &self,
        message_id: &str,
    ) -> impl Future<Output = Result<()>>;
}

/// Stateless HTTP client for the zinktray API
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    /// Create a client for the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            config,
            http: transport::http_client()?,
        })
    }

    /// List all mailboxes known to the server
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a mailbox array.
    pub async fn list_mailboxes(&self) -> Result<Vec<Mailbox>> {
        let url = self.config.endpoint("/api/mailboxes/list")?;
        let mailboxes: Vec<Mailbox> =
            transport::get_json(&self.http, url).await?;

        info!("Listed {} mailboxes", mailboxes.len());
        Ok(mailboxes)
    }

    /// List the messages stored in one mailbox, in server order
    ///
    /// Unknown mailbox ids yield an empty list on the server side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a message array.
    pub async fn list_messages(
        &self,
        mailbox_id: &str,
    ) -> Result<Vec<MessageSummary>> {
        let url =
            self.query_url("/api/messages/list", "mailbox_id", mailbox_id)?;
        let messages: Vec<MessageSummary> =
            transport::get_json(&self.http, url).await?;

        info!("Mailbox '{}' holds {} messages", mailbox_id, messages.len());
        Ok(messages)
    }

    /// Fetch one message including its raw body
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for unknown ids, and the
    /// usual network/parse errors otherwise.
    pub async fn get_message_detail(
        &self,
        message_id: &str,
    ) -> Result<MessageDetail> {
        let url = self.query_url(
            "/api/messages/details",
            "message_id",
            message_id,
        )?;
        transport::get_json(&self.http, url).await
    }

    /// Delete one message
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for unknown ids.
    pub async fn delete_message(&self, message_id: &str) -> Result<()> {
        let url = self.config.endpoint("/api/messages/delete")?;
        transport::post_form(&self.http, url, "message_id", message_id).await?;

        info!("Deleted message '{}'", message_id);
        Ok(())
    }

    /// Delete a mailbox together with its messages
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for unknown ids.
    pub async fn delete_mailbox(&self, mailbox_id: &str) -> Result<()> {
        let url = self.config.endpoint("/api/mailboxes/delete")?;
        transport::post_form(&self.http, url, "mailbox_id", mailbox_id).await?;

        info!("Deleted mailbox '{}'", mailbox_id);
        Ok(())
    }

    // -- private helpers --

    fn query_url(&self, path: &str, key: &str, value: &str) -> Result<Url> {
        let mut url = self.config.endpoint(path)?;
        url.set_query(Some(&format!("{key}={}", urlencoding::encode(value))));
        Ok(url)
    }
}

impl MailApi for ApiClient {
    async fn list_mailboxes(&self) -> Result<Vec<Mailbox>> {
        Self::list_mailboxes(self).await
    }

    async fn list_messages(
        &self,
        mailbox_id: &str,
    ) -> Result<Vec<MessageSummary>> {
        Self::list_messages(self, mailbox_id).await
    }

    async fn get_message_detail(
        &self,
        message_id: &str,
    ) -> Result<MessageDetail> {
        Self::get_message_detail(self, message_id).await
    }

    async fn delete_message(&self, message_id: &str) -> Result<()> {
        Self::delete_message(self, message_id).await
    }
}
