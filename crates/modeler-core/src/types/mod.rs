//! # Core Type Definitions
//!
//! This module contains the entity types managed by Modeler:
//! - Identifiers (`ObjectUuid`, `FieldUuid`, `RecordUuid`)
//! - Entities (`Object`, `Field`, `Record`) and the `Entity` trait
//! - Error types (`ModelerError`)
//!
//! Identifiers are always assigned by the server. Apart from the identifier
//! (and the owning object for fields and records) every attribute is opaque
//! to the client and kept as an insertion-ordered JSON map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

uuid_newtype!(
    /// Server-assigned identifier of an Object. Unique within the object list.
    ObjectUuid
);
uuid_newtype!(
    /// Server-assigned identifier of a Field. Unique within its Object.
    FieldUuid
);
uuid_newtype!(
    /// Server-assigned identifier of a Record. Unique within its Object.
    RecordUuid
);

// =============================================================================
// ENTITY TRAIT
// =============================================================================

/// Anything that can live in a [`CollectionCache`](crate::CollectionCache).
pub trait Entity: Clone {
    /// The local identifier, unique within one parent's sequence.
    type Id: Ord + Clone + fmt::Debug + fmt::Display;

    /// Key under which a mutation response may wrap the entity
    /// (`{"object": {...}}`).
    const ENVELOPE: &'static str;

    /// The entity's local identifier.
    fn id(&self) -> &Self::Id;
}

/// Read a string attribute from an entity's attribute map.
fn attr_str<'a>(attributes: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(Value::as_str)
}

// =============================================================================
// OBJECT
// =============================================================================

/// A user-defined schema entity (a table definition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// Server-assigned identifier.
    pub object_uuid: ObjectUuid,
    /// Every other attribute reported by the server (name, label, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Object {
    /// Create an object with no attributes.
    #[must_use]
    pub fn new(object_uuid: impl Into<String>) -> Self {
        Self {
            object_uuid: ObjectUuid(object_uuid.into()),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// The `name` attribute, if the server reported one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        attr_str(&self.attributes, "name")
    }
}

impl Entity for Object {
    type Id = ObjectUuid;
    const ENVELOPE: &'static str = "object";

    fn id(&self) -> &ObjectUuid {
        &self.object_uuid
    }
}

// =============================================================================
// FIELD
// =============================================================================

/// A schema attribute (column) belonging to exactly one Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Server-assigned identifier, unique within the owning Object.
    pub field_uuid: FieldUuid,
    /// Back-reference to the owning Object, as reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_uuid: Option<ObjectUuid>,
    /// Type and definition metadata.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Field {
    /// Create a field with no attributes.
    #[must_use]
    pub fn new(field_uuid: impl Into<String>) -> Self {
        Self {
            field_uuid: FieldUuid(field_uuid.into()),
            object_uuid: None,
            attributes: Map::new(),
        }
    }

    /// Set the owning object.
    #[must_use]
    pub fn owned_by(mut self, object_uuid: &ObjectUuid) -> Self {
        self.object_uuid = Some(object_uuid.clone());
        self
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// The `name` attribute, if the server reported one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        attr_str(&self.attributes, "name")
    }
}

impl Entity for Field {
    type Id = FieldUuid;
    const ENVELOPE: &'static str = "field";

    fn id(&self) -> &FieldUuid {
        &self.field_uuid
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// A data row belonging to exactly one Object, conforming to its Fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Server-assigned identifier, unique within the owning Object.
    pub record_uuid: RecordUuid,
    /// Back-reference to the owning Object, as reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_uuid: Option<ObjectUuid>,
    /// Field-value pairs.
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Record {
    /// Create a record with no values.
    #[must_use]
    pub fn new(record_uuid: impl Into<String>) -> Self {
        Self {
            record_uuid: RecordUuid(record_uuid.into()),
            object_uuid: None,
            values: Map::new(),
        }
    }

    /// Set the owning object.
    #[must_use]
    pub fn owned_by(mut self, object_uuid: &ObjectUuid) -> Self {
        self.object_uuid = Some(object_uuid.clone());
        self
    }

    /// Builder-style value setter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

impl Entity for Record {
    type Id = RecordUuid;
    const ENVELOPE: &'static str = "record";

    fn id(&self) -> &RecordUuid {
        &self.record_uuid
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelerError {
    /// No valid identifier characters remained after sanitization.
    #[error("invalid identifier after sanitization: {input:?}")]
    InvalidIdentifier { input: String },

    /// Route resolution kept redirecting.
    #[error("too many redirects while resolving {path}")]
    RedirectLoop { path: String },

    /// No route carries the requested name.
    #[error("unknown route: {name}")]
    UnknownRoute { name: String },

    /// A path parameter required by the route pattern was not supplied.
    #[error("route {route} requires parameter {param}")]
    MissingRouteParam { route: String, param: String },
}

// =============================================================================
// TESTS
// =============================================================================
