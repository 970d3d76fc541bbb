use serde::{Deserialize, Serialize};

use crate::models::book::FALLBACK_COVER_URL;
use crate::models::none_if_empty;

/// One persisted bookshelf entry. The server owns these records; the client
/// list is rebuilt by a re-fetch after every mutation and is never patched
/// locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub status: String,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl ShelfEntry {
    pub(crate) fn normalized(mut self) -> Self {
        self.title = self.title.take().and_then(none_if_empty);
        self.author = self.author.take().and_then(none_if_empty);
        self.cover_url = self.cover_url.take().and_then(none_if_empty);
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown title")
    }

    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }

    pub fn cover_or_placeholder(&self) -> &str {
        self.cover_url.as_deref().unwrap_or(FALLBACK_COVER_URL)
    }
}

/// Result of a successful shelf mutation: the server's message plus the
/// re-fetched ground-truth shelf.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub message: String,
    pub shelf: Vec<ShelfEntry>,
}
