//! # Graph backend
//!
//! Real-estate records as a property graph:
//!
//! ```text
//! (:Property {title, type, price, area, rooms})
//!     -[:LOCATED_AT]-> (:Address {city, street, house})
//!     -[:OWNED_BY]->   (:Owner {name})
//! ```
//!
//! Address and Owner nodes are merged on their full attribute tuple, so
//! identity is structural. Property nodes are always created fresh and are
//! matched by `title` for owner attachment and deletion.

pub mod service;
pub mod traverse;

use serde::{Deserialize, Serialize};

use crate::model::{props, Node, PropertyMap, Value};
use crate::Result;

pub use service::GraphService;

/// Node labels.
pub const ADDRESS: &str = "Address";
pub const OWNER: &str = "Owner";
pub const PROPERTY: &str = "Property";

/// Relationship types.
pub const LOCATED_AT: &str = "LOCATED_AT";
pub const OWNED_BY: &str = "OWNED_BY";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house: String,
}

impl Address {
    /// The merge key: every attribute.
    pub fn to_props(&self) -> PropertyMap {
        props([
            ("city", self.city.as_str()),
            ("street", self.street.as_str()),
            ("house", self.house.as_str()),
        ])
    }

    pub fn from_node(node: &Node) -> Result<Self> {
        Ok(Self {
            city: node.get_str("city")?.to_owned(),
            street: node.get_str("street")?.to_owned(),
            house: node.get_str("house")?.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
}

impl Owner {
    pub fn to_props(&self) -> PropertyMap {
        props([("name", self.name.as_str())])
    }

    pub fn from_node(node: &Node) -> Result<Self> {
        Ok(Self { name: node.get_str("name")?.to_owned() })
    }
}

/// Input for [`GraphService::create_property`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub area: f64,
    pub rooms: i64,
    pub address: Address,
    #[serde(default)]
    pub owners: Option<Vec<Owner>>,
}

impl NewProperty {
    /// Scalar attributes stored on the Property node.
    pub fn node_props(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        map.insert("title".into(), Value::from(self.title.as_str()));
        map.insert("type".into(), Value::from(self.kind.as_str()));
        map.insert("price".into(), Value::from(self.price));
        map.insert("area".into(), Value::from(self.area));
        map.insert("rooms".into(), Value::from(self.rooms));
        map
    }
}

/// A Property node joined with its address and owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyView {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub area: f64,
    pub rooms: i64,
    pub address: Option<Address>,
    pub owners: Vec<Owner>,
}

/// Title-only match pattern for Property nodes.
pub(crate) fn title_key(title: &str) -> PropertyMap {
    props([("title", title)])
}
