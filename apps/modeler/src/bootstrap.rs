//! # Bootstrap
//!
//! Application startup: logging, HTTP client, stores, route table and theme,
//! assembled into one [`App`] that lives from start to shutdown. Nothing is
//! global; the CLI (or any other front-end) holds the `App` and passes it
//! down by reference.

use crate::AppError;
use crate::api::HttpClient;
use crate::config::AppConfig;
use crate::store::AppStore;
use crate::theme::Theme;
use modeler_core::{Field, Object, ObjectUuid, Page, Record, RouteMatch, RouteTable};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// LOGGING
// =============================================================================

/// Initialize tracing on stderr.
///
/// `MODELER_LOG_FORMAT=json` enables machine-parseable output; `RUST_LOG`
/// overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let log_format = std::env::var("MODELER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if verbose { "modeler=debug" } else { "modeler=info" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// =============================================================================
// PAGES
// =============================================================================

/// Data a page needs, loaded through the stores.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Home,
    Objects {
        objects: Vec<Object>,
    },
    ObjectDetail {
        object: Object,
        fields: Vec<Field>,
        records: Vec<Record>,
    },
}

// =============================================================================
// APP
// =============================================================================

/// The running application.
pub struct App {
    pub config: AppConfig,
    pub store: Arc<AppStore>,
    pub routes: RouteTable,
    pub theme: Theme,
}

impl App {
    /// Assemble the application from a validated configuration.
    pub fn bootstrap(config: AppConfig) -> Result<Self, AppError> {
        let client = HttpClient::new(&config.api)?;
        let store = Arc::new(AppStore::new(client, config.store.sync_policy));
        let theme = Theme::resolve(config.theme.mode, &config.theme.colors);

        tracing::debug!(
            base_url = %config.api.base_url,
            timeout_ms = config.api.timeout_ms,
            sync_policy = %config.store.sync_policy,
            theme = ?theme.mode,
            "application bootstrapped"
        );

        Ok(Self {
            config,
            store,
            routes: RouteTable::standard(),
            theme,
        })
    }

    /// Resolve a path against the route table.
    pub fn route(&self, path: &str) -> Result<RouteMatch, AppError> {
        Ok(self.routes.resolve(path)?)
    }

    /// Navigate to `path` and load what its page shows.
    pub async fn open(&self, path: &str) -> Result<PageView, AppError> {
        let route = self.route(path)?;
        tracing::debug!(path = %route.path, name = route.name, "opening page");

        match route.page {
            Page::Home => Ok(PageView::Home),
            Page::Objects => {
                self.store.objects.load().await?;
                Ok(PageView::Objects {
                    objects: self.store.objects.all().await,
                })
            }
            Page::ObjectDetail => {
                let id = ObjectUuid::new(route.param("id").unwrap_or_default());
                let (object, _, _) = tokio::try_join!(
                    self.store.objects.fetch_one(&id),
                    self.store.fields.fetch(&id),
                    self.store.records.fetch(&id),
                )?;
                Ok(PageView::ObjectDetail {
                    object,
                    fields: self.store.fields.fields_for(&id).await,
                    records: self.store.records.records_for(&id).await,
                })
            }
        }
    }
}
