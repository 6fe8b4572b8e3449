use serde::{Deserialize, Serialize};

/// Something that can be dragged or dropped onto: a single row, or a whole
/// group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ItemId {
    Row(String),
    Group(String),
}

impl ItemId {
    pub fn row(id: impl Into<String>) -> Self {
        ItemId::Row(id.into())
    }

    pub fn group(id: impl Into<String>) -> Self {
        ItemId::Group(id.into())
    }

    /// The bare identifier, without its kind
    pub fn key(&self) -> &str {
        match self {
            ItemId::Row(id) | ItemId::Group(id) => id,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ItemId::Group(_))
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Row(id) => write!(f, "row {}", id),
            ItemId::Group(id) => write!(f, "group {}", id),
        }
    }
}
