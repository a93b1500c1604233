use serde_json::{Map, Value};

pub type Id = i32;

/// Schema-less document attached to an artwork. Keys are free-form and values
/// are whatever JSON the caller stored; readers must check presence and type
/// before acting on a key.
pub type Metadata = Map<String, Value>;

/// Treat blank strings as missing. Used when validating required names.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
