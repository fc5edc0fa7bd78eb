use std::sync::Arc;

use axum::Router;
use bookbot_core::catalog::{Catalog, CatalogError};
use bookbot_core::config::{AppConfig, ConfigError};
use bookbot_fulfillment::FulfillmentService;
use thiserror::Error;
use tracing::info;

use crate::{health, webhook};

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub fulfillment: Arc<FulfillmentService>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog failed to load: {0}")]
    Catalog(#[from] CatalogError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(Catalog::load(config.catalog.path.as_deref())?);
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        catalog_source = %config
            .catalog
            .path
            .as_deref()
            .map_or_else(|| "embedded".to_owned(), |path| path.display().to_string()),
        "recommendation catalog loaded"
    );

    let fulfillment = Arc::new(FulfillmentService::with_catalog(catalog.clone()));
    info!(
        event_name = "system.bootstrap.dispatcher_ready",
        correlation_id = "bootstrap",
        handlers = fulfillment.dispatcher().handler_count(),
        "intent dispatcher ready"
    );

    Ok(Application { config, catalog, fulfillment })
}

impl Application {
    pub fn router(&self) -> Router {
        webhook::router(self.fulfillment.clone())
            .merge(health::router(self.catalog.clone(), self.fulfillment.clone()))
    }
}
