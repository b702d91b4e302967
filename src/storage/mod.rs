//! # Graph Store Trait
//!
//! This is the contract between the graph service and any graph engine.
//! Every operation the real-estate graph needs is defined here.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryGraph` | `memory` | In-memory for testing/embedding |

pub mod memory;

use async_trait::async_trait;
use crate::model::*;
use crate::tx::{Transaction, TxMode};
use crate::Result;

pub use memory::{MemoryGraph, MemoryTx};

/// Outcome of a find-or-create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merged<T> {
    /// An existing entity matched the key.
    Matched(T),
    /// Nothing matched; a new entity was created.
    Created(T),
}

impl<T: Copy> Merged<T> {
    pub fn id(&self) -> T {
        match self {
            Merged::Matched(id) | Merged::Created(id) => *id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Merged::Created(_))
    }
}

// ============================================================================
// GraphStore Trait
// ============================================================================

/// The graph storage contract.
///
/// Upserts (`merge_node`, `merge_relationship`) have default
/// implementations built from the primitive reads and writes. Those defaults
/// are NOT atomic; engines that can hold a lock across the lookup and the
/// insert should override them.
#[async_trait]
pub trait GraphStore: Send + Sync + 'static {
    /// The transaction type for this store.
    type Tx: Transaction;

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new transaction.
    async fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;

    /// Commit a transaction.
    async fn commit_tx(&self, tx: Self::Tx) -> Result<()>;

    /// Roll back a transaction.
    async fn rollback_tx(&self, tx: Self::Tx) -> Result<()>;

    // ========================================================================
    // Node CRUD
    // ========================================================================

    /// Create a node with the given labels and properties.
    async fn create_node(
        &self,
        tx: &mut Self::Tx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId>;

    /// Get a node by ID. Returns None if not found.
    async fn get_node(&self, tx: &Self::Tx, id: NodeId) -> Result<Option<Node>>;

    /// Delete a node. Returns true if it existed.
    /// Fails if the node still has relationships.
    async fn delete_node(&self, tx: &mut Self::Tx, id: NodeId) -> Result<bool>;

    /// Delete a node and all its relationships in one operation.
    ///
    /// Default: get all relationships, delete each, then delete the node.
    async fn detach_delete_node(&self, tx: &mut Self::Tx, id: NodeId) -> Result<bool> {
        let rels = self.get_relationships(tx, id, Direction::Both, None).await?;
        for rel in &rels {
            self.delete_relationship(tx, rel.id).await?;
        }
        self.delete_node(tx, id).await
    }

    /// Find the node with `label` whose properties contain every entry of
    /// `key`, or create one carrying exactly `key`.
    ///
    /// When several nodes match, the earliest created wins.
    async fn merge_node(
        &self,
        tx: &mut Self::Tx,
        label: &str,
        key: PropertyMap,
    ) -> Result<Merged<NodeId>> {
        let existing = self.nodes_by_properties(tx, label, &key).await?;
        match existing.first() {
            Some(node) => Ok(Merged::Matched(node.id)),
            None => Ok(Merged::Created(self.create_node(tx, &[label], key).await?)),
        }
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    /// Create a relationship between two nodes.
    async fn create_relationship(
        &self,
        tx: &mut Self::Tx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId>;

    /// Create a node together with an outgoing `rel_type` edge to `dst`.
    ///
    /// Default: `create_node` then `create_relationship`. Another writer can
    /// see the node before its edge exists.
    async fn create_linked_node(
        &self,
        tx: &mut Self::Tx,
        labels: &[&str],
        props: PropertyMap,
        rel_type: &str,
        dst: NodeId,
    ) -> Result<(NodeId, RelId)> {
        let id = self.create_node(tx, labels, props).await?;
        let rel = self.create_relationship(tx, id, dst, rel_type, PropertyMap::new()).await?;
        Ok((id, rel))
    }

    /// Delete a relationship. Returns true if it existed.
    async fn delete_relationship(&self, tx: &mut Self::Tx, id: RelId) -> Result<bool>;

    /// Reuse the `src -[rel_type]-> dst` edge if one exists, else create it.
    async fn merge_relationship(
        &self,
        tx: &mut Self::Tx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
    ) -> Result<Merged<RelId>> {
        let rels = self.get_relationships(tx, src, Direction::Outgoing, Some(rel_type)).await?;
        match rels.iter().find(|r| r.dst == dst) {
            Some(rel) => Ok(Merged::Matched(rel.id)),
            None => Ok(Merged::Created(
                self.create_relationship(tx, src, dst, rel_type, PropertyMap::new()).await?,
            )),
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Get all relationships of a node, optionally filtered by direction and type.
    ///
    /// Relationships come back in creation order.
    async fn get_relationships(
        &self,
        tx: &Self::Tx,
        node: NodeId,
        dir: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>>;

    // ========================================================================
    // Scan
    // ========================================================================

    /// Find all nodes with a given label, in creation order.
    async fn nodes_by_label(&self, tx: &Self::Tx, label: &str) -> Result<Vec<Node>>;

    /// Find nodes by label whose properties contain every entry of `pattern`.
    ///
    /// Default: label scan + filter.
    async fn nodes_by_properties(
        &self,
        tx: &Self::Tx,
        label: &str,
        pattern: &PropertyMap,
    ) -> Result<Vec<Node>> {
        let nodes = self.nodes_by_label(tx, label).await?;
        Ok(nodes.into_iter().filter(|n| contains_all(&n.properties, pattern)).collect())
    }

    // ========================================================================
    // Schema introspection
    // ========================================================================

    /// Total number of nodes.
    async fn node_count(&self, tx: &Self::Tx) -> Result<u64>;

    /// Total number of relationships.
    async fn relationship_count(&self, tx: &Self::Tx) -> Result<u64>;
}
