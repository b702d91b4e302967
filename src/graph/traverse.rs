//! Traversal-based reconstruction of property views.
//!
//! Each Property node is expanded along one optional `LOCATED_AT` edge and
//! all of its `OWNED_BY` edges. Missing neighbours are not errors: a property
//! without an address reads back with `address: None`, one without owners
//! with an empty list.

use hashbrown::HashSet;

use crate::model::{Direction, Node};
use crate::storage::GraphStore;
use crate::{Error, Result};
use super::{Address, Owner, PropertyView, LOCATED_AT, OWNED_BY, PROPERTY};

/// Expand every Property node in creation order.
pub async fn property_views<B: GraphStore>(store: &B, tx: &B::Tx) -> Result<Vec<PropertyView>> {
    let nodes = store.nodes_by_label(tx, PROPERTY).await?;
    let mut views = Vec::with_capacity(nodes.len());
    for node in &nodes {
        views.push(property_view(store, tx, node).await?);
    }
    Ok(views)
}

/// Expand one Property node.
pub async fn property_view<B: GraphStore>(store: &B, tx: &B::Tx, node: &Node) -> Result<PropertyView> {
    Ok(PropertyView {
        title: node.get_str("title")?.to_owned(),
        kind: node.get_str("type")?.to_owned(),
        price: node.get_float("price")?,
        area: node.get_float("area")?,
        rooms: node.get_int("rooms")?,
        address: located_at(store, tx, node).await?,
        owners: owned_by(store, tx, node).await?,
    })
}

/// First `LOCATED_AT` target. The write path only ever creates one.
async fn located_at<B: GraphStore>(store: &B, tx: &B::Tx, node: &Node) -> Result<Option<Address>> {
    let rels = store.get_relationships(tx, node.id, Direction::Outgoing, Some(LOCATED_AT)).await?;
    let Some(rel) = rels.first() else {
        return Ok(None);
    };
    let target = neighbour(store, tx, rel.dst).await?;
    Address::from_node(&target).map(Some)
}

/// `OWNED_BY` targets, deduplicated by projected content in first-seen order.
async fn owned_by<B: GraphStore>(store: &B, tx: &B::Tx, node: &Node) -> Result<Vec<Owner>> {
    let rels = store.get_relationships(tx, node.id, Direction::Outgoing, Some(OWNED_BY)).await?;
    let mut seen = HashSet::with_capacity(rels.len());
    let mut owners = Vec::with_capacity(rels.len());
    for rel in &rels {
        let owner = Owner::from_node(&neighbour(store, tx, rel.dst).await?)?;
        if seen.insert(owner.clone()) {
            owners.push(owner);
        }
    }
    Ok(owners)
}

async fn neighbour<B: GraphStore>(store: &B, tx: &B::Tx, id: crate::model::NodeId) -> Result<Node> {
    store.get_node(tx, id).await?
        .ok_or_else(|| Error::StorageError(format!("relationship points at missing node {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{props, PropertyMap, Value};
    use crate::storage::MemoryGraph;
    use crate::tx::TxMode;

    fn property(title: &str) -> PropertyMap {
        let mut map = props([("title", title), ("type", "house")]);
        map.insert("price".into(), Value::from(10.0));
        map.insert("area".into(), Value::from(20.0));
        map.insert("rooms".into(), Value::from(3));
        map
    }

    #[tokio::test]
    async fn test_bare_property_has_no_address_or_owners() {
        let db = MemoryGraph::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        db.create_node(&mut tx, &[PROPERTY], property("Hut")).await.unwrap();

        let views = property_views(&db, &tx).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].address, None);
        assert!(views[0].owners.is_empty());
    }

    #[tokio::test]
    async fn test_owner_collection_is_deduplicated() {
        let db = MemoryGraph::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        let p = db.create_node(&mut tx, &[PROPERTY], property("Villa")).await.unwrap();
        // Two distinct nodes that project to the same owner.
        let a = db.create_node(&mut tx, &["Owner"], props([("name", "Iryna")])).await.unwrap();
        let b = db.create_node(&mut tx, &["Owner"], props([("name", "Iryna")])).await.unwrap();
        let c = db.create_node(&mut tx, &["Owner"], props([("name", "Taras")])).await.unwrap();
        for o in [a, b, c] {
            db.create_relationship(&mut tx, p, o, OWNED_BY, PropertyMap::new()).await.unwrap();
        }

        let views = property_views(&db, &tx).await.unwrap();
        let names: Vec<&str> = views[0].owners.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Iryna", "Taras"]);
    }

    #[tokio::test]
    async fn test_malformed_property_node_is_type_error() {
        let db = MemoryGraph::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        db.create_node(&mut tx, &[PROPERTY], props([("title", "No price")])).await.unwrap();

        let result = property_views(&db, &tx).await;
        assert!(matches!(result, Err(Error::TypeError { .. })));
    }
}
