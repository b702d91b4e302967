//! # realestate-rs: one domain, two storage models
//!
//! Addresses, owners and properties with fractional ownership, kept in two
//! independent backends that answer the same kinds of questions:
//!
//! 1. **Document backend** ([`document`]): three collections; a property
//!    references its address and owners by id, reads resolve those ids by
//!    point lookup and degrade dangling ones to `null`.
//! 2. **Graph backend** ([`graph`] over [`storage`]): labeled nodes joined by
//!    `LOCATED_AT` / `OWNED_BY`; addresses and owners are merged on their
//!    attributes, reads traverse and deduplicate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use realestate::graph::{Address, GraphService, NewProperty, Owner};
//! use realestate::storage::MemoryGraph;
//!
//! # async fn example() -> realestate::Result<()> {
//! let graph = GraphService::new(MemoryGraph::new());
//!
//! graph.create_property(NewProperty {
//!     title: "Riverside loft".into(),
//!     kind: "apartment".into(),
//!     price: 185_000.0,
//!     area: 74.0,
//!     rooms: 3,
//!     address: Address { city: "Kyiv".into(), street: "Naberezhna".into(), house: "8".into() },
//!     owners: Some(vec![Owner { name: "Oksana".into() }]),
//! }).await?;
//!
//! for property in graph.list_properties().await? {
//!     println!("{} → {:?}", property.title, property.address);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage engines
//!
//! | Backend | Engine | Description |
//! |---------|--------|-------------|
//! | Document | `MemoryDocumentStore` | insertion-ordered in-memory collections |
//! | Graph | `MemoryGraph` | in-memory property graph |
//!
//! The `server` feature (default) adds axum routers and the two service
//! binaries.

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod tx;
pub mod graph;
pub mod document;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Relationship, Value, PropertyMap,
    NodeId, RelId, Direction,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{GraphStore, MemoryGraph, Merged};
pub use document::{DocumentId, DocumentStore, MemoryDocumentStore};

// ============================================================================
// Re-exports: Services
// ============================================================================

pub use graph::GraphService;
pub use document::DocumentService;

// ============================================================================
// Re-exports: Transactions
// ============================================================================

pub use tx::{Transaction, TxMode, TxId};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
