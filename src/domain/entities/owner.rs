//! Owner entity referenced by short links.

use serde::Serialize;

/// A user identity that created one or more short links.
///
/// Links keep only a weak reference to their owner; anonymous links have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub id: i64,
    pub name: String,
}

impl Owner {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
