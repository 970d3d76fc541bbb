use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::book::BookSummary;
use crate::models::responses::{MutationReply, SuggestionPayload};
use crate::models::shelf::ShelfEntry;
use crate::services::decode::decode_search_response;
use crate::services::schema::SchemaRegistry;

/// Presentation boundary. Render-only: collecting status text and delete
/// confirmations from the user is the host's job, and their values arrive
/// back as plain operation parameters.
pub trait ResultSink: Send + Sync {
    fn show_results(&self, books: &[BookSummary]);
    fn show_suggestion(&self, book: &BookSummary);
    fn show_shelf(&self, entries: &[ShelfEntry]);
    fn show_error(&self, message: &str);
}

/// Drives the two read-only discovery flows: search (binary wire format)
/// and random suggestion (JSON). Holds no result state; every call stands
/// alone, and a ticket counter keeps a stale search response from
/// clobbering a newer result set.
pub struct DiscoveryController {
    http: Client,
    config: ClientConfig,
    schema: SchemaRegistry,
    ticket: AtomicU64,
}

impl DiscoveryController {
    pub fn new(http: Client, config: ClientConfig) -> Self {
        let schema = SchemaRegistry::new(config.schema_url.clone());
        Self {
            http,
            config,
            schema,
            ticket: AtomicU64::new(0),
        }
    }

    /// Searches the external index and decodes the binary response.
    /// A blank term is rejected before any network traffic.
    pub async fn search(&self, term: &str) -> Result<Vec<BookSummary>, ClientError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        let schema = self.schema.load(&self.http).await?;

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("q", term), ("format", "proto")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Service(format!(
                "search failed with status {status}"
            )));
        }

        let bytes = response.bytes().await?;
        info!("Received {} bytes of search data for '{}'", bytes.len(), term);
        decode_search_response(&bytes, schema)
    }

    /// Fetches one random suggestion. A reply without an identifier is still
    /// returned; it just cannot be shelved.
    pub async fn suggest(&self) -> Result<BookSummary, ClientError> {
        let url = format!("{}/suggestion", self.config.base_url.trim_end_matches('/'));
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reply: MutationReply = serde_json::from_str(&body).unwrap_or_default();
            return Err(ClientError::Service(
                reply
                    .server_error()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("suggestion failed with status {status}")),
            ));
        }

        let payload: SuggestionPayload = serde_json::from_str(&body)?;
        let book = payload.into_summary();
        if !book.is_actionable() {
            warn!("Suggestion arrived without a catalog id; shelf add is unavailable");
        }
        Ok(book)
    }

    /// Runs one search flow end to end: validation, request, decode,
    /// presentation. The ticket taken before the first await is compared
    /// against the counter when the response lands; an overtaken flow is
    /// discarded instead of presented.
    pub async fn run_search(&self, term: &str, sink: &dyn ResultSink) {
        if term.trim().is_empty() {
            sink.show_error(&ClientError::EmptyQuery.to_string());
            return;
        }

        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        match self.search(term).await {
            Ok(books) => {
                if self.ticket.load(Ordering::SeqCst) == ticket {
                    sink.show_results(&books);
                } else {
                    debug!("Discarding stale results for '{}'", term);
                }
            }
            Err(err) => {
                if self.ticket.load(Ordering::SeqCst) == ticket {
                    sink.show_error(&err.to_string());
                } else {
                    debug!("Discarding stale search failure for '{}'", term);
                }
            }
        }
    }

    pub async fn run_suggest(&self, sink: &dyn ResultSink) {
        match self.suggest().await {
            Ok(book) => sink.show_suggestion(&book),
            Err(err) => sink.show_error(&err.to_string()),
        }
    }
}
