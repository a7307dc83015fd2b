pub mod api;
pub mod model;
pub mod schema;
pub mod service;

use std::sync::Arc;

use axum::Router;
use mdp_core::Module;
use mdp_sheet::SheetStore;

use schema::TableSchemas;
use service::Gateway;

pub use schema::SchemaError;

/// The gateway module: table read/save/add/delete/update over HTTP.
pub struct GatewayModule {
    gateway: Arc<Gateway>,
}

impl GatewayModule {
    /// Wrap a sheet store with the given table schemas.
    pub fn new(store: Arc<dyn SheetStore>, schemas: TableSchemas) -> Self {
        Self {
            gateway: Arc::new(Gateway::new(store, Arc::new(schemas))),
        }
    }
}

impl Module for GatewayModule {
    fn name(&self) -> &str {
        "gateway"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.gateway))
    }
}
