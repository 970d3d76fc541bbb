use serde::Deserialize;

use crate::models::book::BookSummary;
use crate::models::none_if_empty;
use crate::models::shelf::ShelfEntry;

/// `GET /bookshelf` reply.
#[derive(Debug, Deserialize)]
pub struct BookshelfReply {
    #[serde(default)]
    pub total: usize,
    pub books: Vec<ShelfEntry>,
}

/// Mutation replies carry `message` on success and `erro` (the server's
/// own spelling) or `error` on failure. Extra fields such as `book` and
/// `deleted_book` are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct MutationReply {
    pub message: Option<String>,
    pub erro: Option<String>,
    pub error: Option<String>,
}

impl MutationReply {
    pub fn server_error(&self) -> Option<&str> {
        self.erro.as_deref().or(self.error.as_deref())
    }
}

/// `author` arrives either as one display string or as a list of names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    One(String),
    Many(Vec<String>),
}

/// `year` arrives either as a number or as a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(i64),
    Text(String),
}

/// `GET /suggestion` reply. The identifier may be published under `id` or
/// `key`; a reply carrying neither still renders, it just cannot be shelved.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionPayload {
    pub id: Option<String>,
    pub key: Option<String>,
    pub title: Option<String>,
    pub author: Option<AuthorField>,
    pub year: Option<YearField>,
    pub cover_url: Option<String>,
}

impl SuggestionPayload {
    pub fn into_summary(self) -> BookSummary {
        let id = self
            .id
            .and_then(none_if_empty)
            .or_else(|| self.key.and_then(none_if_empty));
        let authors = match self.author {
            Some(AuthorField::One(name)) => {
                none_if_empty(name).into_iter().collect()
            }
            Some(AuthorField::Many(names)) => names
                .into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect(),
            None => Vec::new(),
        };
        let year = match self.year {
            Some(YearField::Number(year)) if year > 0 => u32::try_from(year).ok(),
            Some(YearField::Text(text)) => {
                text.trim().parse::<u32>().ok().filter(|year| *year > 0)
            }
            _ => None,
        };
        BookSummary {
            id,
            title: self.title.and_then(none_if_empty),
            authors,
            year,
            cover_url: self.cover_url.and_then(none_if_empty),
        }
    }
}
