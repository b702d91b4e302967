//! # Property Graph Model
//!
//! Plain DTOs for the graph side of the system.
//! These types cross every boundary: storage ↔ graph service ↔ HTTP.
//!
//! Plain data with no I/O or async.

pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId, Labels};
pub use relationship::{Relationship, RelId, Direction};
pub use value::Value;
pub use property_map::{PropertyMap, props, contains_all};
