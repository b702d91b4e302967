//! End-to-end tests for the graph backend.
//!
//! Each test drives `GraphService` over a fresh `MemoryGraph` and checks the
//! resulting graph shape through the `GraphStore` API.

use pretty_assertions::assert_eq;
use realestate::graph::{Address, GraphService, NewProperty, Owner, ADDRESS, OWNED_BY, OWNER, PROPERTY};
use realestate::{Direction, Error, GraphStore, MemoryGraph, TxMode};

// ============================================================================
// Helpers
// ============================================================================

fn service() -> GraphService<MemoryGraph> {
    GraphService::new(MemoryGraph::new())
}

fn address(house: &str) -> Address {
    Address { city: "Uzhhorod".into(), street: "Korzo".into(), house: house.into() }
}

fn owner(name: &str) -> Owner {
    Owner { name: name.into() }
}

fn new_property(title: &str, house: &str, owners: &[&str]) -> NewProperty {
    NewProperty {
        title: title.into(),
        kind: "house".into(),
        price: 150_000.0,
        area: 120.5,
        rooms: 4,
        address: address(house),
        owners: Some(owners.iter().map(|n| owner(n)).collect()),
    }
}

async fn count_label(svc: &GraphService<MemoryGraph>, label: &str) -> usize {
    let tx = svc.store().begin_tx(TxMode::ReadOnly).await.unwrap();
    svc.store().nodes_by_label(&tx, label).await.unwrap().len()
}

// ============================================================================
// 1. Addresses merge on the full attribute tuple
// ============================================================================

#[tokio::test]
async fn test_identical_addresses_merge() {
    let svc = service();
    let first = svc.create_address(address("1")).await.unwrap();
    let second = svc.create_address(address("1")).await.unwrap();
    svc.create_address(address("2")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(count_label(&svc, ADDRESS).await, 2);
}

// ============================================================================
// 2. Owners merge by name, namesakes collapse
// ============================================================================

#[tokio::test]
async fn test_namesake_owners_collapse() {
    let svc = service();
    svc.create_owner(owner("Oleh")).await.unwrap();
    svc.create_owner(owner("Oleh")).await.unwrap();

    assert_eq!(svc.list_owners().await.unwrap(), vec![owner("Oleh")]);
}

// ============================================================================
// 3. Property read-back
// ============================================================================

#[tokio::test]
async fn test_property_reads_back_with_address_and_owners() {
    let svc = service();
    svc.create_property(new_property("Cottage", "5", &["Vira", "Yurii"])).await.unwrap();

    let listed = svc.list_properties().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].address, Some(address("5")));
    assert_eq!(listed[0].owners, vec![owner("Vira"), owner("Yurii")]);
    assert_eq!(listed[0].price, 150_000.0);
    assert_eq!(listed[0].rooms, 4);
}

#[tokio::test]
async fn test_duplicate_owner_in_input_yields_one_edge() {
    let svc = service();
    let created = svc.create_property(new_property("Twin", "6", &["A", "A"])).await.unwrap();
    assert_eq!(created.owners.len(), 2);

    let tx = svc.store().begin_tx(TxMode::ReadOnly).await.unwrap();
    let props = svc.store().nodes_by_label(&tx, PROPERTY).await.unwrap();
    let edges = svc.store()
        .get_relationships(&tx, props[0].id, Direction::Outgoing, Some(OWNED_BY))
        .await
        .unwrap();
    assert_eq!(edges.len(), 1);

    let listed = svc.list_properties().await.unwrap();
    assert_eq!(listed[0].owners, vec![owner("A")]);
}

// ============================================================================
// 4. Title is the property identity
// ============================================================================

#[tokio::test]
async fn test_duplicate_titles_create_separate_nodes_sharing_owners() {
    let svc = service();
    svc.create_property(new_property("Same", "1", &["First"])).await.unwrap();
    svc.create_property(new_property("Same", "2", &["Second"])).await.unwrap();

    assert_eq!(count_label(&svc, PROPERTY).await, 2);

    let listed = svc.list_properties().await.unwrap();
    assert_eq!(listed[0].address, Some(address("1")));
    assert_eq!(listed[1].address, Some(address("2")));
    // Owners are attached to every property that carries the title.
    assert_eq!(listed[0].owners, vec![owner("First"), owner("Second")]);
    assert_eq!(listed[1].owners, vec![owner("Second")]);
}

#[tokio::test]
async fn test_delete_removes_every_property_with_the_title() {
    let svc = service();
    svc.create_property(new_property("Same", "1", &[])).await.unwrap();
    svc.create_property(new_property("Same", "2", &[])).await.unwrap();
    svc.create_property(new_property("Other", "3", &[])).await.unwrap();

    assert_eq!(svc.delete_property("Same").await.unwrap(), 2);

    let titles: Vec<String> = svc.list_properties().await.unwrap().into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["Other"]);
}

// ============================================================================
// 5. Delete leaves address and owner nodes behind
// ============================================================================

#[tokio::test]
async fn test_delete_keeps_address_and_owner_nodes() {
    let svc = service();
    svc.create_property(new_property("Barn", "9", &["Stepan"])).await.unwrap();

    svc.delete_property("Barn").await.unwrap();

    assert!(svc.list_properties().await.unwrap().is_empty());
    assert_eq!(svc.list_addresses().await.unwrap(), vec![address("9")]);
    assert_eq!(svc.list_owners().await.unwrap(), vec![owner("Stepan")]);
    assert_eq!(count_label(&svc, OWNER).await, 1);

    let tx = svc.store().begin_tx(TxMode::ReadOnly).await.unwrap();
    assert_eq!(svc.store().relationship_count(&tx).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_unknown_title_is_not_found_and_changes_nothing() {
    let svc = service();
    svc.create_property(new_property("Barn", "9", &["Stepan"])).await.unwrap();

    let tx = svc.store().begin_tx(TxMode::ReadOnly).await.unwrap();
    let before = (
        svc.store().node_count(&tx).await.unwrap(),
        svc.store().relationship_count(&tx).await.unwrap(),
    );

    let result = svc.delete_property("Palace").await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    let after = (
        svc.store().node_count(&tx).await.unwrap(),
        svc.store().relationship_count(&tx).await.unwrap(),
    );
    assert_eq!(before, after);
}

// ============================================================================
// 6. Concurrent create and delete of one title
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_racing_create_never_strips_a_live_property() {
    let owners: Vec<String> = (0..100).map(|i| format!("Owner {i}")).collect();

    for round in 0..100 {
        let svc = std::sync::Arc::new(service());
        let title = format!("Contested {round}");

        let create = tokio::spawn({
            let svc = svc.clone();
            let names: Vec<&str> = owners.iter().map(String::as_str).collect();
            let input = new_property(&title, "1", &names);
            async move { svc.create_property(input).await }
        });
        let delete = tokio::spawn({
            let svc = svc.clone();
            let title = title.clone();
            async move { svc.delete_property(&title).await }
        });

        create.await.unwrap().unwrap();
        match delete.await.unwrap() {
            Ok(deleted) => assert_eq!(deleted, 1),
            Err(Error::NotFound(_)) => {}
            Err(err) => panic!("delete failed mid-way: {err}"),
        }

        // Either the property is gone entirely or it is intact.
        for view in svc.list_properties().await.unwrap() {
            assert_eq!(view.address, Some(address("1")));
        }
    }
}
