use serde::{Deserialize, Serialize};

/// Endpoint templates for the four remote operations of one resource group.
///
/// Templates are handed to a [`UrlBuilder`](crate::http::UrlBuilder) together with the
/// command parameters, e.g. `"/api/notes/:id"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub read: String,
    pub create: String,
    pub update: String,
    pub delete: String,
}

/// Identifies the resource group a command or event belongs to.
///
/// Owned by whoever sends commands; the mediator only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub schema: Schema,
}

impl Owner {
    pub fn new(id: impl Into<String>, schema: Schema) -> Self {
        Self {
            id: id.into(),
            schema,
        }
    }

    /// Builds an owner for a conventional REST collection: read and create hit the
    /// collection, update and delete hit `collection/:id`.
    pub fn rest(id: impl Into<String>, collection: &str) -> Self {
        let collection = collection.trim_end_matches('/');
        let item = format!("{collection}/:id");
        Self::new(
            id,
            Schema {
                read: collection.to_string(),
                create: collection.to_string(),
                update: item.clone(),
                delete: item,
            },
        )
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
