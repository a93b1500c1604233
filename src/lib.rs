pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{CatalogError, CatalogResult};

// Export logic types
pub use logic::{
    CatalogService, DiscountCampaign, DocumentPattern, FilterBuilder, PageRequest, Pagination,
    Predicate, Restriction, SortResolver, Window,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{InMemoryStore, PostgresStore, Store};

/// Build the full application router over the given store.
pub fn build_app<S: Store + 'static>(
    store: std::sync::Arc<S>,
    limits: config::QueryConfig,
) -> axum::Router {
    let catalog = std::sync::Arc::new(CatalogService::new(store, limits));
    crate::api::routes::create_router::<S>().with_state(catalog)
}
