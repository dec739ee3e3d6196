//! # modeler-core
//!
//! The pure logic behind the Modeler client - THE LOGIC.
//!
//! Modeler manages user-defined **objects** (schema entities), their
//! **fields** (schema attributes) and **records** (data rows) held by a
//! REST backend. This crate contains everything that does not touch the
//! network:
//!
//! - `sanitize` → normalizing free text into machine identifiers
//! - `types` → entity types, identifiers and the core error
//! - `cache` → the normalized, parent-keyed collection cache
//! - `routes` → the static URL-to-page table
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - The cache is a derived copy of server state; only the app layer
//!   decides when it is refreshed
//! - BTreeMap only, for deterministic iteration order

// =============================================================================
// MODULES
// =============================================================================

pub mod cache;
pub mod primitives;
pub mod routes;
pub mod sanitize;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Entity, Field, FieldUuid, ModelerError, Object, ObjectUuid, Record, RecordUuid,
};

// =============================================================================
// RE-EXPORTS: Cache, Routes, Sanitizer
// =============================================================================

pub use cache::{CollectionCache, FetchOutcome, FetchToken};
pub use routes::{Page, RouteMatch, RouteTable};
pub use sanitize::{is_valid_identifier, sanitize_identifier};
