use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{
    with_id, without_id, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    StoreError, UpdateResult,
};

type Rows = Vec<(Uuid, Document)>;

/// Process-local store for development runs and tests. Rows keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Rows>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

fn check_unique(
    collection: Collection,
    rows: &Rows,
    skip: Option<Uuid>,
    document: &Document,
) -> Result<(), StoreError> {
    let Some(field) = collection.unique_field() else {
        return Ok(());
    };
    let Some(value) = document.get(field) else {
        return Ok(());
    };
    let taken = rows
        .iter()
        .any(|(id, existing)| Some(*id) != skip && existing.get(field) == Some(value));
    if taken {
        return Err(StoreError::Duplicate {
            collection: collection.name(),
            field,
        });
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|(id, doc)| filter.matches(*id, doc))
            .map(|(id, doc)| with_id(*id, doc.clone()))
            .collect())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .into_iter()
            .flatten()
            .find(|(id, doc)| filter.matches(*id, doc))
            .map(|(id, doc)| with_id(*id, doc.clone())))
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOneResult, StoreError> {
        let document = without_id(document);
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();
        check_unique(collection, rows, None, &document)?;

        let id = Uuid::new_v4();
        rows.push((id, document));
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult, StoreError> {
        let set = without_id(set);
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();

        let Some(index) = rows.iter().position(|(id, doc)| filter.matches(*id, doc)) else {
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            });
        };

        let id = rows[index].0;
        check_unique(collection, rows, Some(id), &set)?;

        let doc = &mut rows[index].1;
        let changed = set.iter().any(|(field, value)| doc.get(field) != Some(value));
        if changed {
            doc.extend(set);
        }

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(changed),
            upserted_id: None,
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();

        let deleted_count = match rows.iter().position(|(id, doc)| filter.matches(*id, doc)) {
            Some(index) => {
                rows.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::ID_FIELD;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_ignores_client_id() {
        let store = MemoryStore::new();
        let result = store
            .insert_one(Collection::Menu, doc(json!({ "_id": "mine", "name": "Salad" })))
            .await
            .unwrap();

        let found = store
            .find_one(Collection::Menu, &Filter::by_id(result.inserted_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found[ID_FIELD], json!(result.inserted_id.to_string()));
        assert_eq!(found["name"], "Salad");
    }

    #[tokio::test]
    async fn find_filters_and_keeps_insertion_order() {
        let store = MemoryStore::new();
        for (email, item) in [("a@x.io", "pizza"), ("b@x.io", "soup"), ("a@x.io", "cake")] {
            store
                .insert_one(Collection::Carts, doc(json!({ "email": email, "name": item })))
                .await
                .unwrap();
        }

        let items = store
            .find(Collection::Carts, &Filter::eq("email", "a@x.io"))
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["pizza", "cake"]);

        assert!(store.find(Collection::Reviews, &Filter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn users_email_is_unique() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Users, doc(json!({ "email": "a@x.io" })))
            .await
            .unwrap();

        let err = store
            .insert_one(Collection::Users, doc(json!({ "email": "a@x.io" })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "email", .. }));
        assert_eq!(store.count(Collection::Users).await, 1);
    }

    #[tokio::test]
    async fn update_reports_matched_and_modified() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Users, doc(json!({ "email": "a@x.io" })))
            .await
            .unwrap()
            .inserted_id;
        let set = doc(json!({ "role": "admin" }));

        let first = store
            .update_one(Collection::Users, &Filter::by_id(id), set.clone())
            .await
            .unwrap();
        assert_eq!((first.matched_count, first.modified_count), (1, 1));

        let again = store
            .update_one(Collection::Users, &Filter::by_id(id), set.clone())
            .await
            .unwrap();
        assert_eq!((again.matched_count, again.modified_count), (1, 0));

        let missing = store
            .update_one(Collection::Users, &Filter::by_id(Uuid::new_v4()), set)
            .await
            .unwrap();
        assert_eq!((missing.matched_count, missing.modified_count), (0, 0));
    }

    #[tokio::test]
    async fn delete_removes_one_then_is_a_no_op() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Carts, doc(json!({ "email": "a@x.io" })))
            .await
            .unwrap()
            .inserted_id;
        store
            .insert_one(Collection::Carts, doc(json!({ "email": "a@x.io" })))
            .await
            .unwrap();

        let first = store.delete_one(Collection::Carts, &Filter::by_id(id)).await.unwrap();
        assert_eq!(first.deleted_count, 1);
        let second = store.delete_one(Collection::Carts, &Filter::by_id(id)).await.unwrap();
        assert_eq!(second.deleted_count, 0);
        assert_eq!(store.count(Collection::Carts).await, 1);
    }
}
