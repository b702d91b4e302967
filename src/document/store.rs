//! # Document Store Trait
//!
//! The contract between the document service and a document engine: three
//! collections, insert / scan / point lookup, one filtered property query,
//! and single-record property deletion.

use async_trait::async_trait;

use crate::Result;
use super::{Address, Document, DocumentId, Owner, Property};

// ============================================================================
// Property query
// ============================================================================

/// The fixed set of property predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyFilter {
    /// Every property.
    All,
    /// `price > threshold`
    PriceAbove(i64),
    /// `type == kind`
    TypeIs(String),
    /// `area > min_area AND price < max_price`
    AreaPrice { min_area: i64, max_price: i64 },
    /// Any owner entry with this `owner_id` (string equality).
    OwnedBy(String),
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            PropertyFilter::All => true,
            PropertyFilter::PriceAbove(threshold) => property.price > *threshold,
            PropertyFilter::TypeIs(kind) => property.kind == *kind,
            PropertyFilter::AreaPrice { min_area, max_price } => {
                property.area > *min_area && property.price < *max_price
            }
            PropertyFilter::OwnedBy(owner_id) => {
                property.owners.iter().any(|o| o.owner_id == *owner_id)
            }
        }
    }
}

/// Offset/limit window. `limit == 0` means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

/// Filter, optional price-descending sort, optional page.
///
/// Evaluation order is filter → sort → skip → limit.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub filter: PropertyFilter,
    pub price_descending: bool,
    pub page: Option<Page>,
}

impl PropertyQuery {
    pub fn new(filter: PropertyFilter) -> Self {
        Self { filter, price_descending: false, page: None }
    }

    pub fn all() -> Self {
        Self::new(PropertyFilter::All)
    }

    pub fn sorted_by_price_desc(mut self) -> Self {
        self.price_descending = true;
        self
    }

    pub fn page(mut self, skip: usize, limit: usize) -> Self {
        self.page = Some(Page { skip, limit });
        self
    }

    /// Run the query over records in natural (insertion) order.
    ///
    /// The sort is stable, so equal prices keep insertion order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<Document<Property>>
    where
        I: IntoIterator<Item = &'a Document<Property>>,
    {
        let mut hits: Vec<Document<Property>> = records.into_iter()
            .filter(|doc| self.filter.matches(&doc.body))
            .cloned()
            .collect();

        if self.price_descending {
            hits.sort_by(|a, b| b.body.price.cmp(&a.body.price));
        }

        match self.page {
            Some(Page { skip, limit }) => {
                let window = hits.into_iter().skip(skip);
                if limit == 0 { window.collect() } else { window.take(limit).collect() }
            }
            None => hits,
        }
    }
}

// ============================================================================
// DocumentStore Trait
// ============================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    // ========================================================================
    // addresses
    // ========================================================================

    /// Insert unconditionally; identical addresses get distinct ids.
    async fn insert_address(&self, address: Address) -> Result<DocumentId>;

    async fn find_addresses(&self) -> Result<Vec<Document<Address>>>;

    async fn find_address(&self, id: &DocumentId) -> Result<Option<Document<Address>>>;

    // ========================================================================
    // owners
    // ========================================================================

    async fn insert_owner(&self, owner: Owner) -> Result<DocumentId>;

    async fn find_owners(&self) -> Result<Vec<Document<Owner>>>;

    async fn find_owner(&self, id: &DocumentId) -> Result<Option<Document<Owner>>>;

    // ========================================================================
    // properties
    // ========================================================================

    /// Insert as-is. `address_id` and `owner_id`s are not checked.
    async fn insert_property(&self, property: Property) -> Result<DocumentId>;

    async fn find_properties(&self, query: &PropertyQuery) -> Result<Vec<Document<Property>>>;

    /// Remove at most one record. Returns the number removed (0 or 1).
    async fn delete_property(&self, id: &DocumentId) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::OwnerShare;

    fn doc(title: &str, price: i64, area: i64) -> Document<Property> {
        Document::new(DocumentId::generate(), Property {
            title: title.into(),
            kind: if area > 100 { "house".into() } else { "flat".into() },
            price,
            area,
            rooms: 1,
            amenities: vec![],
            address_id: "none".into(),
            owners: vec![OwnerShare { owner_id: format!("owner-{title}"), share: 1.0 }],
        })
    }

    fn titles(docs: &[Document<Property>]) -> Vec<&str> {
        docs.iter().map(|d| d.body.title.as_str()).collect()
    }

    #[test]
    fn test_filters_are_strict() {
        let docs = vec![doc("a", 100, 50), doc("b", 200, 150), doc("c", 300, 50)];

        let above = PropertyQuery::new(PropertyFilter::PriceAbove(200)).apply(&docs);
        assert_eq!(titles(&above), vec!["c"]);

        let range = PropertyQuery::new(PropertyFilter::AreaPrice { min_area: 50, max_price: 300 }).apply(&docs);
        assert_eq!(titles(&range), vec!["b"]);

        let kind = PropertyQuery::new(PropertyFilter::TypeIs("flat".into())).apply(&docs);
        assert_eq!(titles(&kind), vec!["a", "c"]);

        let owned = PropertyQuery::new(PropertyFilter::OwnedBy("owner-b".into())).apply(&docs);
        assert_eq!(titles(&owned), vec!["b"]);
    }

    #[test]
    fn test_sort_then_page() {
        let docs = vec![doc("a", 100, 1), doc("b", 300, 1), doc("c", 200, 1), doc("d", 300, 1)];

        let all = PropertyQuery::all().sorted_by_price_desc().page(0, 5).apply(&docs);
        assert_eq!(titles(&all), vec!["b", "d", "c", "a"]);

        let window = PropertyQuery::all().sorted_by_price_desc().page(1, 2).apply(&docs);
        assert_eq!(titles(&window), vec!["d", "c"]);

        let unlimited = PropertyQuery::all().sorted_by_price_desc().page(2, 0).apply(&docs);
        assert_eq!(titles(&unlimited), vec!["c", "a"]);

        let past_end = PropertyQuery::all().sorted_by_price_desc().page(10, 5).apply(&docs);
        assert!(past_end.is_empty());
    }
}
