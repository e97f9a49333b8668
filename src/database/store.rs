use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// A stored JSON object. Read results carry their id under [`ID_FIELD`].
pub type Document = Map<String, Value>;

/// Key under which a document's storage-native id is exposed.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Menu,
    Reviews,
    Carts,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Menu,
        Collection::Reviews,
        Collection::Carts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Menu => "menu",
            Collection::Reviews => "reviews",
            Collection::Carts => "carts",
        }
    }

    /// Top-level field that must be unique across the collection, if any.
    pub fn unique_field(self) -> Option<&'static str> {
        match self {
            Collection::Users => Some("email"),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate {field} in {collection}")]
    Duplicate {
        collection: &'static str,
        field: &'static str,
    },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Equality match on a document's id and/or top-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub id: Option<Uuid>,
    pub fields: Map<String, Value>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn matches(&self, id: Uuid, document: &Document) -> bool {
        if self.id.is_some_and(|wanted| wanted != id) {
            return false;
        }
        self.fields
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Document store seam shared by handlers and middleware.
///
/// Every operation is a single round-trip; nothing spans calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError>;

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOneResult, StoreError>;

    /// Merge `set` into the first matching document.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Attach the storage id to a document body for output.
pub fn with_id(id: Uuid, mut document: Document) -> Document {
    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    document
}

/// Drop any client-supplied id; ids are assigned by the store.
pub fn without_id(mut document: Document) -> Document {
    document.remove(ID_FIELD);
    document
}
