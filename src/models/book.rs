use serde::{Deserialize, Serialize};

/// Shown when a record carries no cover of its own.
pub const FALLBACK_COVER_URL: &str =
    "https://img.freepik.com/psd-gratuitas/mockup-de-livro-branco-em-branco-perfeito-para-projetos-de-capa-de-livro-e-projetos-de-publicacao_191095-80351.jpg?semt=ais_hybrid&w=740&q=80";

/// One search result or suggestion record, normalized from the wire.
///
/// Built fresh on every decode and never mutated; a new search discards the
/// previous result set. A record without an `id` cannot be added to the
/// shelf (see [`BookSummary::is_actionable`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: Option<u32>,
    pub cover_url: Option<String>,
}

impl BookSummary {
    /// Whether the shelf-add affordance may be offered for this record.
    pub fn is_actionable(&self) -> bool {
        self.id.is_some()
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown title")
    }

    pub fn display_authors(&self) -> String {
        if self.authors.is_empty() {
            "Unknown".to_string()
        } else {
            self.authors.join(", ")
        }
    }

    pub fn display_year(&self) -> String {
        self.year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "????".to_string())
    }

    pub fn cover_or_placeholder(&self) -> &str {
        self.cover_url.as_deref().unwrap_or(FALLBACK_COVER_URL)
    }
}
