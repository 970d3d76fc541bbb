use std::collections::HashMap;

use regex::Regex;
use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::ClientError;
use crate::services::decode::{BOOK_FIELDS, SEARCH_RESPONSE_FIELDS};

pub const SEARCH_RESPONSE_MESSAGE: &str = "SearchResponse";
pub const BOOK_MESSAGE: &str = "Book";

/// One field the compiled decoder expects the published schema to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedField {
    pub name: &'static str,
    pub type_name: &'static str,
    pub tag: u32,
    pub repeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub type_name: String,
    pub tag: u32,
    pub repeated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MessageSchema {
    pub fields: Vec<FieldSchema>,
}

impl MessageSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Compiled message-type descriptors parsed from the published schema text.
/// Construction validates the search contract, so holding a handle means the
/// server and the decoder agree on the wire layout.
#[derive(Debug, Clone)]
pub struct SchemaHandle {
    messages: HashMap<String, MessageSchema>,
}

impl SchemaHandle {
    pub fn from_proto_text(text: &str) -> Result<Self, ClientError> {
        let handle = Self::parse(text)?;
        handle.verify_message(SEARCH_RESPONSE_MESSAGE, SEARCH_RESPONSE_FIELDS)?;
        handle.verify_message(BOOK_MESSAGE, BOOK_FIELDS)?;
        Ok(handle)
    }

    pub fn message(&self, name: &str) -> Option<&MessageSchema> {
        self.messages.get(name)
    }

    fn parse(text: &str) -> Result<Self, ClientError> {
        let comment_re = Regex::new(r"//[^\n]*").unwrap();
        let message_re = Regex::new(r"message\s+(\w+)\s*\{([^{}]*)\}").unwrap();
        let field_re = Regex::new(r"(?m)^\s*(repeated\s+)?(\w+)\s+(\w+)\s*=\s*(\d+)\s*;").unwrap();

        let stripped = comment_re.replace_all(text, "");
        let mut messages = HashMap::new();

        for message in message_re.captures_iter(&stripped) {
            let name = message[1].to_string();
            let mut fields = Vec::new();
            for field in field_re.captures_iter(&message[2]) {
                let tag = field[4].parse::<u32>().map_err(|_| {
                    ClientError::SchemaLoad(format!("field tag out of range in message {name}"))
                })?;
                fields.push(FieldSchema {
                    repeated: field.get(1).is_some(),
                    type_name: field[2].to_string(),
                    name: field[3].to_string(),
                    tag,
                });
            }
            messages.insert(name, MessageSchema { fields });
        }

        if messages.is_empty() {
            return Err(ClientError::SchemaLoad(
                "no message definitions found in schema text".to_string(),
            ));
        }
        Ok(Self { messages })
    }

    fn verify_message(
        &self,
        name: &str,
        expected: &[ExpectedField],
    ) -> Result<(), ClientError> {
        let message = self.messages.get(name).ok_or_else(|| {
            ClientError::SchemaLoad(format!("schema does not define message {name}"))
        })?;
        for want in expected {
            let field = message.field(want.name).ok_or_else(|| {
                ClientError::SchemaLoad(format!("message {name} is missing field {}", want.name))
            })?;
            if field.tag != want.tag
                || field.repeated != want.repeated
                || field.type_name != want.type_name
            {
                return Err(ClientError::SchemaLoad(format!(
                    "field {name}.{} does not match the decoder: expected {}{} = {}, schema has {}{} = {}",
                    want.name,
                    if want.repeated { "repeated " } else { "" },
                    want.type_name,
                    want.tag,
                    if field.repeated { "repeated " } else { "" },
                    field.type_name,
                    field.tag,
                )));
            }
        }
        Ok(())
    }
}

/// Fetches and caches the search schema. The cell is written once, on the
/// first successful load; concurrent first calls share a single in-flight
/// fetch, and a failed load leaves the cell empty so a later call retries.
pub struct SchemaRegistry {
    schema_url: String,
    cell: OnceCell<SchemaHandle>,
}

impl SchemaRegistry {
    pub fn new(schema_url: impl Into<String>) -> Self {
        Self {
            schema_url: schema_url.into(),
            cell: OnceCell::new(),
        }
    }

    pub async fn load(&self, http: &Client) -> Result<&SchemaHandle, ClientError> {
        self.cell
            .get_or_try_init(|| async {
                info!("Loading search schema from {}", self.schema_url);
                let response = http.get(&self.schema_url).send().await.map_err(|err| {
                    ClientError::SchemaLoad(format!("schema resource unreachable: {err}"))
                })?;
                if !response.status().is_success() {
                    return Err(ClientError::SchemaLoad(format!(
                        "schema resource returned status {}",
                        response.status()
                    )));
                }
                let text = response.text().await.map_err(|err| {
                    ClientError::SchemaLoad(format!("failed to read schema resource: {err}"))
                })?;
                SchemaHandle::from_proto_text(&text)
            })
            .await
    }
}
