//! References that the backend sends either as a bare id or as a populated
//! document.

use serde::{Deserialize, Serialize};

/// A reference to another entity.
///
/// Depending on the endpoint, the backend either sends the referenced id as a
/// string or populates the whole document in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    /// Only the id of the referenced entity.
    Id(String),
    /// The referenced entity, populated.
    Populated(Box<T>),
}

/// Entities that carry a backend id.
pub trait HasId {
    fn id(&self) -> &str;
}

impl<T: HasId> Ref<T> {
    /// The referenced id, whichever form the reference arrived in.
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Populated(entity) => entity.id(),
        }
    }

    /// The populated entity, if the backend sent one.
    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Populated(entity) => Some(entity),
        }
    }
}
