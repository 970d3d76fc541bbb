pub mod book;
pub mod responses;
pub mod shelf;

/// The server writes `""` where the catalog has no value for a field.
pub(crate) fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
