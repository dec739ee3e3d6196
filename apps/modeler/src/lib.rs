//! # Modeler
//!
//! Client for a low-code backend that stores user-defined **objects**, their
//! **fields** and their **records**.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     apps/modeler (THE BINARY)                │
//! │                                                              │
//! │  ┌─────────┐   ┌──────────────┐   ┌──────────────────────┐   │
//! │  │   CLI   │──▶│ Store modules│──▶│  API clients (HTTP)  │──▶ REST backend
//! │  │ (clap)  │   │ (cache sync) │   │     (reqwest)        │   │
//! │  └────┬────┘   └──────┬───────┘   └──────────────────────┘   │
//! │       │               ▼                                      │
//! │       │       ┌───────────────┐                              │
//! │       └──────▶│ modeler-core  │ sanitizer · cache · routes   │
//! │               └───────────────┘                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flow: a command dispatches an action on a store module, the store
//! calls its API client, the response updates the cache, and the command
//! renders the cache.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod theme;

pub use bootstrap::{App, PageView};
pub use config::AppConfig;
pub use error::AppError;
pub use store::{AppStore, SyncPolicy};
