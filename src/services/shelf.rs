use reqwest::{Client, Response};
use serde::Serialize;
use tracing::info;

use crate::error::ClientError;
use crate::models::responses::{BookshelfReply, MutationReply};
use crate::models::shelf::{MutationOutcome, ShelfEntry};
use crate::utils::path::escape_shelf_id;

#[derive(Debug, Serialize)]
struct AddBookRequest<'a> {
    ol_id: &'a str,
    status: &'a str,
    author: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateStatusRequest<'a> {
    status: &'a str,
}

/// CRUD façade over the remote `/bookshelf` resource.
///
/// Every successful mutation is followed by an unconditional re-list; the
/// returned [`MutationOutcome`] carries the server's message together with
/// the re-fetched shelf, and the client never trusts its own optimistic
/// state.
pub struct ShelfStore {
    http: Client,
    base_url: String,
}

impl ShelfStore {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn add(
        &self,
        id: &str,
        author: &str,
        status: &str,
    ) -> Result<MutationOutcome, ClientError> {
        info!("Adding {} to the shelf", id);
        let url = format!("{}/bookshelf", self.base_url);
        let payload = AddBookRequest {
            ol_id: id,
            status,
            author,
        };
        let response = self.http.post(&url).json(&payload).send().await?;
        let message = read_mutation_reply(response).await?;
        let shelf = self.list().await?;
        Ok(MutationOutcome { message, shelf })
    }

    pub async fn update(&self, id: &str, status: &str) -> Result<MutationOutcome, ClientError> {
        info!("Updating reading status of {}", id);
        let url = format!("{}/bookshelf/{}", self.base_url, escape_shelf_id(id));
        let response = self
            .http
            .put(&url)
            .json(&UpdateStatusRequest { status })
            .send()
            .await?;
        let message = read_mutation_reply(response).await?;
        let shelf = self.list().await?;
        Ok(MutationOutcome { message, shelf })
    }

    pub async fn remove(&self, id: &str) -> Result<MutationOutcome, ClientError> {
        info!("Removing {} from the shelf", id);
        let url = format!("{}/bookshelf/{}", self.base_url, escape_shelf_id(id));
        let response = self.http.delete(&url).send().await?;
        let message = read_mutation_reply(response).await?;
        let shelf = self.list().await?;
        Ok(MutationOutcome { message, shelf })
    }

    /// Fetches the full shelf. An empty shelf is a valid state, not an error.
    pub async fn list(&self) -> Result<Vec<ShelfEntry>, ClientError> {
        let url = format!("{}/bookshelf", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reply: MutationReply = serde_json::from_str(&body).unwrap_or_default();
            return Err(service_error(&reply, status));
        }

        let reply: BookshelfReply = serde_json::from_str(&body)?;
        info!("Shelf holds {} entries", reply.total);
        Ok(reply
            .books
            .into_iter()
            .map(ShelfEntry::normalized)
            .collect())
    }
}

async fn read_mutation_reply(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    let reply: MutationReply = serde_json::from_str(&body).unwrap_or_default();

    if status.is_success() {
        Ok(reply
            .message
            .unwrap_or_else(|| "operation completed".to_string()))
    } else {
        Err(service_error(&reply, status))
    }
}

fn service_error(reply: &MutationReply, status: reqwest::StatusCode) -> ClientError {
    ClientError::Service(
        reply
            .server_error()
            .map(str::to_string)
            .unwrap_or_else(|| format!("shelf request failed with status {status}")),
    )
}
