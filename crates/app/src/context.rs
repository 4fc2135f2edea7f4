//! App Context

use std::sync::Arc;

use doruken::prelude::{Storefront, StorefrontError};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::AppConfig,
    database::Db,
    domain::{
        invoices::{InvoicesService, StorefrontInvoicesService},
        orders::{OrdersService, PgOrdersService},
    },
    render::{InvoiceRenderer, RenderError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load storefront: {0}")]
    Storefront(#[from] StorefrontError),

    #[error("failed to prepare invoice renderer: {0}")]
    Render(#[from] RenderError),
}

#[derive(Clone)]
pub struct AppContext {
    pub db: Db,
    pub storefront: Storefront,
    pub orders: Arc<dyn OrdersService>,
    pub invoices: Arc<dyn InvoicesService>,
}

impl AppContext {
    /// Build application context from configuration. No connection is opened here;
    /// each operation connects on its own.
    ///
    /// # Errors
    ///
    /// Returns an error when the storefront, templates or stylesheets cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let db = Db::new(config.database.connect_options());
        let storefront = config.render.load_storefront()?;
        let renderer = InvoiceRenderer::from_config(&config.render)?;

        debug!(
            engine = renderer.engine_name(),
            packages = storefront.catalog.packages().len(),
            "initialising app context"
        );

        let orders: Arc<dyn OrdersService> =
            Arc::new(PgOrdersService::new(db.clone(), storefront.catalog.clone()));

        let invoices = Arc::new(StorefrontInvoicesService::new(
            Arc::clone(&orders),
            storefront.clone(),
            Arc::new(renderer),
            config.render.logo_uri(),
        ));

        Ok(Self {
            db,
            storefront,
            orders,
            invoices,
        })
    }
}
