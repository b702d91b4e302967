//! # Document backend
//!
//! Three independent collections (`addresses`, `owners`, `properties`).
//! A property points at its address and owners by identifier; nothing checks
//! those identifiers on write. Reads rebuild the nested view by point lookups
//! (see [`resolve`]), and a reference that does not resolve reads back as
//! `null`.

pub mod id;
pub mod memory;
pub mod resolve;
pub mod service;
pub mod store;

use serde::{Deserialize, Serialize};

pub use id::DocumentId;
pub use memory::MemoryDocumentStore;
pub use resolve::{ReferenceSource, ResolvedOwnerShare, ResolvedProperty};
pub use service::DocumentService;
pub use store::{DocumentStore, Page, PropertyFilter, PropertyQuery};

/// A stored record: its generated `_id` plus the body fields, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Document<T> {
    pub fn new(id: DocumentId, body: T) -> Self {
        Self { id, body }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
}

/// One owner entry on a property. `share` is stored as given; shares of a
/// property are not required to sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerShare {
    pub owner_id: String,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: i64,
    pub area: i64,
    pub rooms: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub address_id: String,
    pub owners: Vec<OwnerShare>,
}

/// Response body of the create operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Created {
    #[serde(rename = "_id")]
    pub id: DocumentId,
}
