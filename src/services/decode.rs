use prost::Message;

use crate::error::ClientError;
use crate::models::book::BookSummary;
use crate::models::none_if_empty;
use crate::services::schema::{ExpectedField, SchemaHandle, SEARCH_RESPONSE_MESSAGE};

/// Field layout the wire structs below are compiled against. The schema
/// published by the server is checked against these tables at load time, so
/// drift fails the load instead of silently mis-decoding.
pub(crate) const SEARCH_RESPONSE_FIELDS: &[ExpectedField] = &[ExpectedField {
    name: "books",
    type_name: "Book",
    tag: 1,
    repeated: true,
}];

pub(crate) const BOOK_FIELDS: &[ExpectedField] = &[
    ExpectedField {
        name: "id",
        type_name: "string",
        tag: 1,
        repeated: false,
    },
    ExpectedField {
        name: "title",
        type_name: "string",
        tag: 2,
        repeated: false,
    },
    ExpectedField {
        name: "author",
        type_name: "string",
        tag: 3,
        repeated: true,
    },
    ExpectedField {
        name: "year",
        type_name: "int32",
        tag: 4,
        repeated: false,
    },
    ExpectedField {
        name: "cover_url",
        type_name: "string",
        tag: 5,
        repeated: false,
    },
];

#[derive(Clone, PartialEq, Message)]
pub struct BookProto {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, repeated, tag = "3")]
    pub author: Vec<String>,
    #[prost(int32, tag = "4")]
    pub year: i32,
    #[prost(string, tag = "5")]
    pub cover_url: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct SearchResponseProto {
    #[prost(message, repeated, tag = "1")]
    pub books: Vec<BookProto>,
}

/// Decodes a binary search response into normalized records, preserving the
/// server's order. A buffer that does not conform to the schema fails as a
/// whole; no partial sequence is returned.
pub fn decode_search_response(
    bytes: &[u8],
    schema: &SchemaHandle,
) -> Result<Vec<BookSummary>, ClientError> {
    if schema.message(SEARCH_RESPONSE_MESSAGE).is_none() {
        return Err(ClientError::SchemaLoad(format!(
            "schema handle does not describe {SEARCH_RESPONSE_MESSAGE}"
        )));
    }
    let wire = SearchResponseProto::decode(bytes)?;
    Ok(wire.books.into_iter().map(normalize_book).collect())
}

/// The server writes `""` for a missing id or cover and `0` for a missing
/// publication year; none of those survive past this boundary.
fn normalize_book(book: BookProto) -> BookSummary {
    BookSummary {
        id: none_if_empty(book.id),
        title: none_if_empty(book.title),
        authors: book
            .author
            .into_iter()
            .filter(|author| !author.trim().is_empty())
            .collect(),
        year: u32::try_from(book.year).ok().filter(|year| *year > 0),
        cover_url: none_if_empty(book.cover_url),
    }
}
