//! Property-based checks of the document query pipeline.

use proptest::prelude::*;
use realestate::document::{Document, OwnerShare, Property, PropertyFilter, PropertyQuery};
use realestate::DocumentId;

fn record(index: usize, price: i64, area: i64) -> Document<Property> {
    Document::new(
        DocumentId::generate(),
        Property {
            title: format!("p{index}"),
            kind: "flat".into(),
            price,
            area,
            rooms: 1,
            amenities: vec![],
            address_id: String::new(),
            owners: vec![OwnerShare { owner_id: String::new(), share: 1.0 }],
        },
    )
}

fn records(prices_and_areas: &[(i64, i64)]) -> Vec<Document<Property>> {
    prices_and_areas.iter()
        .enumerate()
        .map(|(i, (price, area))| record(i, *price, *area))
        .collect()
}

proptest! {
    #[test]
    fn sorted_page_is_non_increasing(
        rows in prop::collection::vec((0i64..1_000, 0i64..500), 0..40),
        skip in 0usize..50,
        limit in 0usize..50,
    ) {
        let docs = records(&rows);
        let page = PropertyQuery::all().sorted_by_price_desc().page(skip, limit).apply(&docs);

        prop_assert!(page.windows(2).all(|w| w[0].body.price >= w[1].body.price));

        let expected = rows.len().saturating_sub(skip);
        let expected = if limit == 0 { expected } else { expected.min(limit) };
        prop_assert_eq!(page.len(), expected);
    }

    #[test]
    fn equal_prices_keep_insertion_order(
        prices in prop::collection::vec(0i64..4, 0..30),
    ) {
        let rows: Vec<(i64, i64)> = prices.iter().map(|p| (*p, 1)).collect();
        let docs = records(&rows);
        let sorted = PropertyQuery::all().sorted_by_price_desc().apply(&docs);

        for w in sorted.windows(2) {
            if w[0].body.price == w[1].body.price {
                let a: usize = w[0].body.title[1..].parse().unwrap();
                let b: usize = w[1].body.title[1..].parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn default_range_filter_keeps_every_in_range_record(
        rows in prop::collection::vec((0i64..999_999_999, 1i64..10_000), 0..30),
    ) {
        let docs = records(&rows);
        let filtered = PropertyQuery::new(PropertyFilter::AreaPrice { min_area: 0, max_price: 1_000_000_000 })
            .apply(&docs);
        let all = PropertyQuery::all().apply(&docs);

        prop_assert_eq!(filtered, all);
    }
}
