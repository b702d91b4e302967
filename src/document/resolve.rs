//! Reference resolution for stored properties.
//!
//! A stored [`Property`] carries `address_id` and, per owner entry, an
//! `owner_id`. Resolution attaches the referenced records' projections next
//! to those ids with one point lookup per reference. A reference that does
//! not resolve, including one that is not even a well-formed id, yields
//! `None` rather than an error. Lookup failures of the source itself still
//! propagate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use super::store::DocumentStore;
use super::{Address, Document, DocumentId, Owner, Property};

/// Point lookups the resolver needs, one per referenced collection.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn address(&self, id: &str) -> Result<Option<Address>>;

    async fn owner(&self, id: &str) -> Result<Option<Owner>>;
}

#[async_trait]
impl<S: DocumentStore> ReferenceSource for S {
    async fn address(&self, id: &str) -> Result<Option<Address>> {
        let Ok(id) = DocumentId::parse(id) else {
            return Ok(None);
        };
        Ok(self.find_address(&id).await?.map(|doc| doc.body))
    }

    async fn owner(&self, id: &str) -> Result<Option<Owner>> {
        let Ok(id) = DocumentId::parse(id) else {
            return Ok(None);
        };
        Ok(self.find_owner(&id).await?.map(|doc| doc.body))
    }
}

/// An owner entry with its owner record attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOwnerShare {
    pub owner_id: String,
    pub share: f64,
    pub owner: Option<Owner>,
}

/// A stored property with its references resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProperty {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: i64,
    pub area: i64,
    pub rooms: i64,
    pub amenities: Vec<String>,
    pub address_id: String,
    pub owners: Vec<ResolvedOwnerShare>,
    pub address: Option<Address>,
}

/// Resolve one property's address and owner references.
pub async fn resolve_property<R>(source: &R, doc: Document<Property>) -> Result<ResolvedProperty>
where
    R: ReferenceSource + ?Sized,
{
    let Document { id, body } = doc;

    let address = source.address(&body.address_id).await?;
    if address.is_none() {
        tracing::warn!(property = %id, address_id = %body.address_id, "dangling address reference");
    }

    let mut owners = Vec::with_capacity(body.owners.len());
    for entry in body.owners {
        let owner = source.owner(&entry.owner_id).await?;
        if owner.is_none() {
            tracing::warn!(property = %id, owner_id = %entry.owner_id, "dangling owner reference");
        }
        owners.push(ResolvedOwnerShare { owner_id: entry.owner_id, share: entry.share, owner });
    }

    Ok(ResolvedProperty {
        id,
        title: body.title,
        kind: body.kind,
        price: body.price,
        area: body.area,
        rooms: body.rooms,
        amenities: body.amenities,
        address_id: body.address_id,
        owners,
        address,
    })
}

/// Resolve a batch, one property at a time. No lookup is cached.
pub async fn resolve_all<R>(source: &R, docs: Vec<Document<Property>>) -> Result<Vec<ResolvedProperty>>
where
    R: ReferenceSource + ?Sized,
{
    let mut resolved = Vec::with_capacity(docs.len());
    for doc in docs {
        resolved.push(resolve_property(source, doc).await?);
    }
    Ok(resolved)
}
