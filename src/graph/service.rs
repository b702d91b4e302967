//! Graph-backed real-estate operations.

use crate::storage::GraphStore;
use crate::tx::TxMode;
use crate::{Error, Result};
use super::traverse;
use super::{
    title_key, Address, NewProperty, Owner, PropertyView,
    ADDRESS, LOCATED_AT, OWNED_BY, OWNER, PROPERTY,
};

/// CRUD over the real-estate graph.
///
/// Every public method runs its store calls in its own transaction(s); there
/// is no cross-request locking.
pub struct GraphService<B: GraphStore> {
    store: B,
}

impl<B: GraphStore> GraphService<B> {
    pub fn new(store: B) -> Self {
        Self { store }
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &B {
        &self.store
    }

    // ========================================================================
    // Addresses
    // ========================================================================

    /// Upsert an Address keyed by `(city, street, house)`.
    #[tracing::instrument(skip(self))]
    pub async fn create_address(&self, address: Address) -> Result<Address> {
        let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
        let merged = self.store.merge_node(&mut tx, ADDRESS, address.to_props()).await?;
        tracing::debug!(created = merged.was_created(), "address merged");
        let id = merged.id();
        let node = self.store.get_node(&tx, id).await?
            .ok_or_else(|| Error::NotFound(format!("Address node {id}")))?;
        self.store.commit_tx(tx).await?;
        Address::from_node(&node)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>> {
        let tx = self.store.begin_tx(TxMode::ReadOnly).await?;
        let nodes = self.store.nodes_by_label(&tx, ADDRESS).await?;
        self.store.commit_tx(tx).await?;
        nodes.iter().map(Address::from_node).collect()
    }

    // ========================================================================
    // Owners
    // ========================================================================

    /// Upsert an Owner keyed by name. Namesakes collapse into one node.
    #[tracing::instrument(skip(self))]
    pub async fn create_owner(&self, owner: Owner) -> Result<Owner> {
        let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
        let merged = self.store.merge_node(&mut tx, OWNER, owner.to_props()).await?;
        tracing::debug!(created = merged.was_created(), "owner merged");
        let id = merged.id();
        let node = self.store.get_node(&tx, id).await?
            .ok_or_else(|| Error::NotFound(format!("Owner node {id}")))?;
        self.store.commit_tx(tx).await?;
        Owner::from_node(&node)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_owners(&self) -> Result<Vec<Owner>> {
        let tx = self.store.begin_tx(TxMode::ReadOnly).await?;
        let nodes = self.store.nodes_by_label(&tx, OWNER).await?;
        self.store.commit_tx(tx).await?;
        nodes.iter().map(Owner::from_node).collect()
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Create a Property with its address and owners.
    ///
    /// Runs as three separately committed steps:
    ///
    /// 1. merge the Address node;
    /// 2. create the Property node and link it `LOCATED_AT` the address;
    /// 3. per owner, merge the Owner node and link every Property with this
    ///    title `OWNED_BY` it.
    ///
    /// The steps are not atomic. A failure after step 1 leaves an orphan
    /// Address; a failure inside step 3 leaves the Property with only some
    /// of its owners. Nothing is rolled back.
    ///
    /// A same-title Property deleted concurrently between the title lookup
    /// and the attach is skipped.
    ///
    /// The returned view echoes `owners` as given (duplicates included)
    /// rather than reading them back.
    #[tracing::instrument(skip(self, new), fields(title = %new.title))]
    pub async fn create_property(&self, new: NewProperty) -> Result<PropertyView> {
        let owners = new.owners.clone().unwrap_or_default();

        // Step 1: address
        let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
        let address_id = self.store.merge_node(&mut tx, ADDRESS, new.address.to_props()).await?.id();
        self.store.commit_tx(tx).await?;

        // Step 2: property + LOCATED_AT
        let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
        let (property_id, _) = self.store
            .create_linked_node(&mut tx, &[PROPERTY], new.node_props(), LOCATED_AT, address_id)
            .await?;
        let address_node = self.store.get_node(&tx, address_id).await?
            .ok_or_else(|| Error::NotFound(format!("Address node {address_id}")))?;
        self.store.commit_tx(tx).await?;
        let address = Address::from_node(&address_node)?;
        tracing::debug!(property = %property_id, address = %address_id, "property created");

        // Step 3: owners, attached to every property sharing the title
        for owner in &owners {
            let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
            let owner_id = self.store.merge_node(&mut tx, OWNER, owner.to_props()).await?.id();
            let holders = self.store.nodes_by_properties(&tx, PROPERTY, &title_key(&new.title)).await?;
            if holders.len() > 1 {
                tracing::warn!(
                    title = %new.title,
                    matches = holders.len(),
                    "title is shared by several properties; owner attached to all of them"
                );
            }
            for holder in &holders {
                match self.store.merge_relationship(&mut tx, holder.id, owner_id, OWNED_BY).await {
                    Ok(_) => {}
                    // Deleted since the title lookup; there is nothing left to own.
                    Err(Error::NotFound(_)) => {
                        tracing::debug!(property = %holder.id, "property removed before owner attached");
                    }
                    Err(err) => return Err(err),
                }
            }
            self.store.commit_tx(tx).await?;
        }

        Ok(PropertyView {
            title: new.title,
            kind: new.kind,
            price: new.price,
            area: new.area,
            rooms: new.rooms,
            address: Some(address),
            owners,
        })
    }

    /// Every Property with its address (if any) and deduplicated owners.
    #[tracing::instrument(skip(self))]
    pub async fn list_properties(&self) -> Result<Vec<PropertyView>> {
        let tx = self.store.begin_tx(TxMode::ReadOnly).await?;
        let views = traverse::property_views(&self.store, &tx).await?;
        self.store.commit_tx(tx).await?;
        Ok(views)
    }

    /// Detach-delete every Property whose title matches.
    ///
    /// Returns how many nodes were removed. Linked Address and Owner nodes
    /// are left in place.
    #[tracing::instrument(skip(self))]
    pub async fn delete_property(&self, title: &str) -> Result<usize> {
        let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
        let matches = self.store.nodes_by_properties(&tx, PROPERTY, &title_key(title)).await?;
        if matches.is_empty() {
            self.store.rollback_tx(tx).await?;
            return Err(Error::NotFound("Property not found".into()));
        }

        let mut deleted = 0;
        for node in &matches {
            if self.store.detach_delete_node(&mut tx, node.id).await? {
                deleted += 1;
            }
        }
        self.store.commit_tx(tx).await?;
        tracing::info!(title, deleted, "property deleted");
        Ok(deleted)
    }
}
