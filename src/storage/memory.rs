//! In-memory graph store.
//!
//! This is the reference implementation of `GraphStore`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No real transactions**: `commit_tx()` and `rollback_tx()` are no-ops.
//!   Writes are applied immediately. Rollback does NOT undo mutations.
//! - **Per-call atomicity**: every write, including `merge_node`,
//!   `merge_relationship` and `detach_delete_node`, runs under one critical
//!   section. A sequence of calls is not atomic.
//! - **Lock order**: `label_index` → `nodes` → `adjacency` → `relationships`.
//!   Every method that holds more than one lock takes them in this order.
//! - **No property indexes**: property lookups scan the label index.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::*;
use crate::tx::{Transaction, TxMode, TxId};
use crate::{Error, Result};
use super::{GraphStore, Merged};

// ============================================================================
// MemoryGraph
// ============================================================================

/// In-memory property graph storage. Cloning shares the same graph.
#[derive(Clone, Default)]
pub struct MemoryGraph {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → relationship IDs, creation order
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    /// label → node IDs, creation order
    label_index: RwLock<HashMap<String, Vec<NodeId>>>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
    next_tx_id: AtomicU64,
}

impl Default for MemoryInner {
    fn default() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            relationships: RwLock::new(HashMap::new()),
            adjacency: RwLock::new(HashMap::new()),
            label_index: RwLock::new(HashMap::new()),
            next_node_id: AtomicU64::new(1),
            next_rel_id: AtomicU64::new(1),
            next_tx_id: AtomicU64::new(1),
        }
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInner {
    /// Insert a node while the caller holds both index and node locks.
    fn insert_node(
        &self,
        label_index: &mut HashMap<String, Vec<NodeId>>,
        nodes: &mut HashMap<NodeId, Node>,
        labels: &[&str],
        props: PropertyMap,
    ) -> NodeId {
        let id = NodeId(self.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node::new(id, labels.iter().copied(), props);
        for label in &node.labels {
            label_index.entry(label.clone()).or_default().push(id);
        }
        nodes.insert(id, node);
        id
    }

    /// Insert a relationship while the caller holds adjacency and relationship locks.
    fn insert_relationship(
        &self,
        adjacency: &mut HashMap<NodeId, Vec<RelId>>,
        relationships: &mut HashMap<RelId, Relationship>,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> RelId {
        let id = RelId(self.next_rel_id.fetch_add(1, Ordering::Relaxed));
        let mut rel = Relationship::new(id, src, dst, rel_type);
        rel.properties = props;
        relationships.insert(id, rel);

        adjacency.entry(src).or_default().push(id);
        if src != dst {
            adjacency.entry(dst).or_default().push(id);
        }
        id
    }

    /// Drop a removed node from the label index.
    fn unindex(label_index: &mut HashMap<String, Vec<NodeId>>, node: &Node) {
        for label in &node.labels {
            if let Some(ids) = label_index.get_mut(label) {
                ids.retain(|nid| *nid != node.id);
            }
        }
    }

    /// Both endpoints must exist. The caller keeps `nodes` locked until the
    /// edge is inserted.
    fn ensure_endpoints(nodes: &HashMap<NodeId, Node>, src: NodeId, dst: NodeId) -> Result<()> {
        if !nodes.contains_key(&src) {
            return Err(Error::NotFound(format!("Source node {src}")));
        }
        if !nodes.contains_key(&dst) {
            return Err(Error::NotFound(format!("Target node {dst}")));
        }
        Ok(())
    }
}

// ============================================================================
// MemoryTx
// ============================================================================

/// In-memory transaction (a mode marker, no MVCC).
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

// ============================================================================
// GraphStore impl
// ============================================================================

#[async_trait]
impl GraphStore for MemoryGraph {
    type Tx = MemoryTx;

    async fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        let id = TxId(self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed));
        Ok(MemoryTx { id, mode })
    }

    /// No-op: memory store applies writes immediately, not on commit.
    async fn commit_tx(&self, _tx: MemoryTx) -> Result<()> { Ok(()) }

    /// WARNING: No-op. Memory store has no write-ahead log.
    /// Mutations applied during this transaction are NOT reverted.
    async fn rollback_tx(&self, _tx: MemoryTx) -> Result<()> { Ok(()) }

    // ========================================================================
    // Node CRUD
    // ========================================================================

    async fn create_node(
        &self,
        tx: &mut MemoryTx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId> {
        tx.ensure_writable()?;
        let mut idx = self.inner.label_index.write();
        let mut nodes = self.inner.nodes.write();
        Ok(self.inner.insert_node(&mut idx, &mut nodes, labels, props))
    }

    async fn get_node(&self, _tx: &MemoryTx, id: NodeId) -> Result<Option<Node>> {
        Ok(self.inner.nodes.read().get(&id).cloned())
    }

    async fn delete_node(&self, tx: &mut MemoryTx, id: NodeId) -> Result<bool> {
        tx.ensure_writable()?;
        let mut idx = self.inner.label_index.write();
        let mut nodes = self.inner.nodes.write();
        let mut adj = self.inner.adjacency.write();

        // A connected node can't be deleted; use detach_delete_node.
        if let Some(rels) = adj.get(&id).filter(|rels| !rels.is_empty()) {
            return Err(Error::ConstraintViolation(
                format!("Cannot delete node {id} with {} relationships. Delete relationships first.", rels.len())
            ));
        }

        let Some(node) = nodes.remove(&id) else {
            return Ok(false);
        };
        adj.remove(&id);
        MemoryInner::unindex(&mut idx, &node);
        tracing::debug!(node = %id, labels = ?node.labels, "node deleted");
        Ok(true)
    }

    /// The node and every relationship touching it go under one set of
    /// write locks, so no edge can be attached halfway through.
    async fn detach_delete_node(&self, tx: &mut MemoryTx, id: NodeId) -> Result<bool> {
        tx.ensure_writable()?;
        let mut idx = self.inner.label_index.write();
        let mut nodes = self.inner.nodes.write();
        let mut adj = self.inner.adjacency.write();
        let mut rels = self.inner.relationships.write();

        let Some(node) = nodes.remove(&id) else {
            return Ok(false);
        };

        let detached = adj.remove(&id).unwrap_or_default();
        for rid in &detached {
            let Some(rel) = rels.remove(rid) else { continue };
            let other = if rel.src == id { rel.dst } else { rel.src };
            if let Some(ids) = adj.get_mut(&other) {
                ids.retain(|r| r != rid);
            }
        }
        MemoryInner::unindex(&mut idx, &node);
        tracing::debug!(node = %id, relationships = detached.len(), "node detach-deleted");
        Ok(true)
    }

    /// Lookup and insert happen under one pair of write locks, so two
    /// concurrent merges with the same key yield one node.
    async fn merge_node(
        &self,
        tx: &mut MemoryTx,
        label: &str,
        key: PropertyMap,
    ) -> Result<Merged<NodeId>> {
        tx.ensure_writable()?;
        let mut idx = self.inner.label_index.write();
        let mut nodes = self.inner.nodes.write();

        let hit = idx.get(label).and_then(|ids| {
            ids.iter()
                .copied()
                .find(|id| nodes.get(id).is_some_and(|n| contains_all(&n.properties, &key)))
        });

        match hit {
            Some(id) => {
                tracing::debug!(node = %id, label, "merge matched existing node");
                Ok(Merged::Matched(id))
            }
            None => {
                let id = self.inner.insert_node(&mut idx, &mut nodes, &[label], key);
                tracing::debug!(node = %id, label, "merge created node");
                Ok(Merged::Created(id))
            }
        }
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut MemoryTx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        tx.ensure_writable()?;
        let nodes = self.inner.nodes.read();
        MemoryInner::ensure_endpoints(&nodes, src, dst)?;

        let mut adj = self.inner.adjacency.write();
        let mut rels = self.inner.relationships.write();
        Ok(self.inner.insert_relationship(&mut adj, &mut rels, src, dst, rel_type, props))
    }

    async fn create_linked_node(
        &self,
        tx: &mut MemoryTx,
        labels: &[&str],
        props: PropertyMap,
        rel_type: &str,
        dst: NodeId,
    ) -> Result<(NodeId, RelId)> {
        tx.ensure_writable()?;
        let mut idx = self.inner.label_index.write();
        let mut nodes = self.inner.nodes.write();
        if !nodes.contains_key(&dst) {
            return Err(Error::NotFound(format!("Target node {dst}")));
        }
        let id = self.inner.insert_node(&mut idx, &mut nodes, labels, props);

        let mut adj = self.inner.adjacency.write();
        let mut rels = self.inner.relationships.write();
        let rel = self.inner.insert_relationship(&mut adj, &mut rels, id, dst, rel_type, PropertyMap::new());
        Ok((id, rel))
    }

    async fn delete_relationship(&self, tx: &mut MemoryTx, id: RelId) -> Result<bool> {
        tx.ensure_writable()?;
        let mut adj = self.inner.adjacency.write();
        let removed = self.inner.relationships.write().remove(&id);
        if let Some(rel) = &removed {
            if let Some(rels) = adj.get_mut(&rel.src) {
                rels.retain(|rid| *rid != id);
            }
            if rel.src != rel.dst {
                if let Some(rels) = adj.get_mut(&rel.dst) {
                    rels.retain(|rid| *rid != id);
                }
            }
        }
        Ok(removed.is_some())
    }

    async fn merge_relationship(
        &self,
        tx: &mut MemoryTx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
    ) -> Result<Merged<RelId>> {
        tx.ensure_writable()?;
        let nodes = self.inner.nodes.read();
        MemoryInner::ensure_endpoints(&nodes, src, dst)?;

        let mut adj = self.inner.adjacency.write();
        let mut rels = self.inner.relationships.write();

        let hit = adj.get(&src).and_then(|ids| {
            ids.iter().copied().find(|rid| {
                rels.get(rid)
                    .is_some_and(|r| r.src == src && r.dst == dst && r.rel_type == rel_type)
            })
        });

        match hit {
            Some(id) => Ok(Merged::Matched(id)),
            None => Ok(Merged::Created(self.inner.insert_relationship(
                &mut adj, &mut rels, src, dst, rel_type, PropertyMap::new(),
            ))),
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    async fn get_relationships(
        &self,
        _tx: &MemoryTx,
        node: NodeId,
        dir: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>> {
        let adj = self.inner.adjacency.read();
        let rels = self.inner.relationships.read();

        let Some(rel_ids) = adj.get(&node) else {
            return Ok(Vec::new());
        };

        Ok(rel_ids.iter()
            .filter_map(|rid| rels.get(rid))
            .filter(|rel| rel.touches(node, dir))
            .filter(|rel| rel_type.is_none_or(|t| rel.rel_type == t))
            .cloned()
            .collect())
    }

    // ========================================================================
    // Scan
    // ========================================================================

    async fn nodes_by_label(&self, _tx: &MemoryTx, label: &str) -> Result<Vec<Node>> {
        let idx = self.inner.label_index.read();
        let nodes = self.inner.nodes.read();

        let Some(ids) = idx.get(label) else {
            return Ok(Vec::new());
        };
        Ok(ids.iter().filter_map(|id| nodes.get(id).cloned()).collect())
    }

    // ========================================================================
    // Schema introspection
    // ========================================================================

    async fn node_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.nodes.read().len() as u64)
    }

    async fn relationship_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.relationships.read().len() as u64)
    }
}

// ============================================================================
// Tests
// ============================================================================
