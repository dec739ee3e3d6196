//! # Primitives
//!
//! Fixed constants shared by the core and the app layer.

/// Maximum length of a sanitized identifier, in characters.
///
/// Longer input is truncated, never rejected.
pub const MAX_IDENTIFIER_LENGTH: usize = 60;

/// Default base URL of the REST backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Maximum number of redirects followed while resolving a route.
pub const MAX_ROUTE_REDIRECTS: usize = 8;

// =============================================================================
// HTTP STATUS CODES RECOGNIZED BY THE STORE
// =============================================================================

/// 200 OK - read or update succeeded.
pub const STATUS_OK: u16 = 200;

/// 201 Created - the only status that counts as a successful create.
pub const STATUS_CREATED: u16 = 201;

/// 204 No Content - delete (or update) succeeded without a body.
pub const STATUS_NO_CONTENT: u16 = 204;

/// Statuses that count as a successful update.
pub const UPDATE_SUCCESS: &[u16] = &[STATUS_OK, STATUS_NO_CONTENT];

/// Statuses that count as a successful delete.
pub const DELETE_SUCCESS: &[u16] = &[STATUS_OK, STATUS_NO_CONTENT];
