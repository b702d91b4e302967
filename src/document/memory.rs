//! In-memory document store.
//!
//! Each collection is an insertion-ordered `Vec` behind its own `RwLock`,
//! so a full scan returns records in natural order. Point lookups scan.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::Result;
use super::store::{DocumentStore, PropertyQuery};
use super::{Address, Document, DocumentId, Owner, Property};

/// One named collection of records.
struct Collection<T> {
    name: &'static str,
    docs: RwLock<Vec<Document<T>>>,
}

impl<T: Clone> Collection<T> {
    fn new(name: &'static str) -> Self {
        Self { name, docs: RwLock::new(Vec::new()) }
    }

    fn insert(&self, body: T) -> DocumentId {
        let id = DocumentId::generate();
        self.docs.write().push(Document::new(id, body));
        tracing::debug!(collection = self.name, id = %id, "document inserted");
        id
    }

    fn find_all(&self) -> Vec<Document<T>> {
        self.docs.read().clone()
    }

    fn find_one(&self, id: &DocumentId) -> Option<Document<T>> {
        self.docs.read().iter().find(|d| d.id == *id).cloned()
    }

    fn delete_one(&self, id: &DocumentId) -> u64 {
        let mut docs = self.docs.write();
        match docs.iter().position(|d| d.id == *id) {
            Some(pos) => {
                docs.remove(pos);
                tracing::debug!(collection = self.name, id = %id, "document deleted");
                1
            }
            None => 0,
        }
    }

    fn len(&self) -> usize {
        self.docs.read().len()
    }
}

/// In-memory document database. Cloning shares the same collections.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    addresses: Collection<Address>,
    owners: Collection<Owner>,
    properties: Collection<Property>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                addresses: Collection::new("addresses"),
                owners: Collection::new("owners"),
                properties: Collection::new("properties"),
            }),
        }
    }

    /// Record counts as `(addresses, owners, properties)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.inner.addresses.len(),
            self.inner.owners.len(),
            self.inner.properties.len(),
        )
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_address(&self, address: Address) -> Result<DocumentId> {
        Ok(self.inner.addresses.insert(address))
    }

    async fn find_addresses(&self) -> Result<Vec<Document<Address>>> {
        Ok(self.inner.addresses.find_all())
    }

    async fn find_address(&self, id: &DocumentId) -> Result<Option<Document<Address>>> {
        Ok(self.inner.addresses.find_one(id))
    }

    async fn insert_owner(&self, owner: Owner) -> Result<DocumentId> {
        Ok(self.inner.owners.insert(owner))
    }

    async fn find_owners(&self) -> Result<Vec<Document<Owner>>> {
        Ok(self.inner.owners.find_all())
    }

    async fn find_owner(&self, id: &DocumentId) -> Result<Option<Document<Owner>>> {
        Ok(self.inner.owners.find_one(id))
    }

    async fn insert_property(&self, property: Property) -> Result<DocumentId> {
        Ok(self.inner.properties.insert(property))
    }

    async fn find_properties(&self, query: &PropertyQuery) -> Result<Vec<Document<Property>>> {
        let docs = self.inner.properties.docs.read();
        Ok(query.apply(docs.iter()))
    }

    async fn delete_property(&self, id: &DocumentId) -> Result<u64> {
        Ok(self.inner.properties.delete_one(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(house: &str) -> Address {
        Address { city: "Poltava".into(), street: "Soborna".into(), house: house.into() }
    }

    #[tokio::test]
    async fn test_insert_does_not_dedup() {
        let db = MemoryDocumentStore::new();
        let a = db.insert_address(address("1")).await.unwrap();
        let b = db.insert_address(address("1")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(db.find_addresses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scan_keeps_insertion_order() {
        let db = MemoryDocumentStore::new();
        for name in ["Zoya", "Andriy", "Marta"] {
            db.insert_owner(Owner { name: name.into() }).await.unwrap();
        }

        let names: Vec<String> = db.find_owners().await.unwrap()
            .into_iter()
            .map(|d| d.body.name)
            .collect();
        assert_eq!(names, vec!["Zoya", "Andriy", "Marta"]);
    }

    #[tokio::test]
    async fn test_point_lookup() {
        let db = MemoryDocumentStore::new();
        let id = db.insert_address(address("7")).await.unwrap();

        let found = db.find_address(&id).await.unwrap().unwrap();
        assert_eq!(found.body, address("7"));
        assert!(db.find_address(&DocumentId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let db = MemoryDocumentStore::new();
        let property = Property {
            title: "Shed".into(),
            kind: "other".into(),
            price: 1,
            area: 1,
            rooms: 0,
            amenities: vec![],
            address_id: "x".into(),
            owners: vec![],
        };
        let id = db.insert_property(property.clone()).await.unwrap();
        db.insert_property(property).await.unwrap();

        assert_eq!(db.delete_property(&id).await.unwrap(), 1);
        assert_eq!(db.delete_property(&id).await.unwrap(), 0);
        assert_eq!(db.counts(), (0, 0, 1));
    }
}
