//! Document-backed real-estate operations.

use crate::{Error, Result};
use super::resolve::{resolve_all, ResolvedProperty};
use super::store::{DocumentStore, PropertyFilter, PropertyQuery};
use super::{Address, Document, DocumentId, Owner, Property};

/// `filter_properties` lower area bound when none is given.
pub const DEFAULT_MIN_AREA: i64 = 0;
/// `filter_properties` upper price bound when none is given.
pub const DEFAULT_MAX_PRICE: i64 = 1_000_000_000;
/// `list_properties_sorted` offset when none is given.
pub const DEFAULT_SKIP: usize = 0;
/// `list_properties_sorted` page size when none is given.
pub const DEFAULT_LIMIT: usize = 5;

/// CRUD over the three document collections.
///
/// Every listing runs reference resolution afresh.
pub struct DocumentService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> DocumentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_address(&self, address: Address) -> Result<DocumentId> {
        self.store.insert_address(address).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Document<Address>>> {
        self.store.find_addresses().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_owner(&self, owner: Owner) -> Result<DocumentId> {
        self.store.insert_owner(owner).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_owners(&self) -> Result<Vec<Document<Owner>>> {
        self.store.find_owners().await
    }

    /// Store a property as given. Neither `address_id` nor any `owner_id`
    /// has to exist, and shares are not validated.
    #[tracing::instrument(skip(self, property), fields(title = %property.title))]
    pub async fn create_property(&self, property: Property) -> Result<DocumentId> {
        let total_share: f64 = property.owners.iter().map(|o| o.share).sum();
        if !property.owners.is_empty() && (total_share - 1.0).abs() > f64::EPSILON {
            tracing::debug!(total_share, "owner shares do not sum to 1.0");
        }
        self.store.insert_property(property).await
    }

    pub async fn list_properties(&self) -> Result<Vec<ResolvedProperty>> {
        self.query(PropertyQuery::all()).await
    }

    /// `price > threshold`
    pub async fn list_properties_price_above(&self, threshold: i64) -> Result<Vec<ResolvedProperty>> {
        self.query(PropertyQuery::new(PropertyFilter::PriceAbove(threshold))).await
    }

    pub async fn list_properties_by_type(&self, kind: &str) -> Result<Vec<ResolvedProperty>> {
        self.query(PropertyQuery::new(PropertyFilter::TypeIs(kind.to_owned()))).await
    }

    /// `area > min_area AND price < max_price`; unset bounds fall back to
    /// [`DEFAULT_MIN_AREA`] / [`DEFAULT_MAX_PRICE`].
    pub async fn filter_properties(
        &self,
        min_area: Option<i64>,
        max_price: Option<i64>,
    ) -> Result<Vec<ResolvedProperty>> {
        let filter = PropertyFilter::AreaPrice {
            min_area: min_area.unwrap_or(DEFAULT_MIN_AREA),
            max_price: max_price.unwrap_or(DEFAULT_MAX_PRICE),
        };
        self.query(PropertyQuery::new(filter)).await
    }

    pub async fn list_properties_by_owner(&self, owner_id: &str) -> Result<Vec<ResolvedProperty>> {
        self.query(PropertyQuery::new(PropertyFilter::OwnedBy(owner_id.to_owned()))).await
    }

    /// Price descending, then `skip`, then `limit` (`0` = unlimited).
    pub async fn list_properties_sorted(
        &self,
        skip: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<ResolvedProperty>> {
        let query = PropertyQuery::all()
            .sorted_by_price_desc()
            .page(skip.unwrap_or(DEFAULT_SKIP), limit.unwrap_or(DEFAULT_LIMIT));
        self.query(query).await
    }

    /// Remove one property by id. Its address and owners stay.
    #[tracing::instrument(skip(self))]
    pub async fn delete_property(&self, id: &str) -> Result<()> {
        let id = DocumentId::parse(id)?;
        match self.store.delete_property(&id).await? {
            0 => Err(Error::NotFound("Property not found".into())),
            _ => {
                tracing::info!(id = %id, "property deleted");
                Ok(())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn query(&self, query: PropertyQuery) -> Result<Vec<ResolvedProperty>> {
        let docs = self.store.find_properties(&query).await?;
        resolve_all(&self.store, docs).await
    }
}
