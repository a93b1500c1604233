use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Reference entities
        .route(
            "/artists",
            get(handlers::list_artists::<S>).post(handlers::create_artist::<S>),
        )
        .route("/artists/:id", get(handlers::get_artist::<S>))
        .route(
            "/genres",
            get(handlers::list_genres::<S>).post(handlers::create_genre::<S>),
        )
        .route("/genres/:id", get(handlers::get_genre::<S>))
        .route(
            "/museums",
            get(handlers::list_museums::<S>).post(handlers::create_museum::<S>),
        )
        .route("/museums/:id", get(handlers::get_museum::<S>))
        // Artworks
        .route(
            "/artworks",
            get(handlers::list_artworks::<S>).post(handlers::create_artwork::<S>),
        )
        .route("/artworks/filter", get(handlers::filter_artworks::<S>))
        .route(
            "/artworks/filter/paginated",
            get(handlers::filter_artworks_paginated::<S>),
        )
        .route(
            "/artworks/search/metadata",
            get(handlers::search_artwork_metadata::<S>),
        )
        .route(
            "/artworks/stats/by-country",
            get(handlers::artwork_stats_by_country::<S>),
        )
        .route(
            "/artworks/discount",
            post(handlers::apply_artwork_discount::<S>),
        )
        .route("/artworks/:id", get(handlers::get_artwork::<S>))
}
