use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::CatalogError;
use crate::logic::{CatalogService, SortResolver};
use crate::model::{
    Artist, Artwork, ArtworkFilter, ArtworkSort, CountryStats, Genre, Id, Museum, NewArtist,
    NewArtwork, NewGenre, NewMuseum, Page,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<CatalogService<S>>;

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Translate a catalog error into a status code and JSON body.
pub fn error_response(err: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        log::error!("Request failed: {}", err);
    }

    (status, Json(ErrorResponse::new(&err.to_string())))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtworkPageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ArtworkPageQuery {
    fn sort(&self) -> ArtworkSort {
        SortResolver::resolve(self.sort_by.as_deref(), self.sort_order.as_deref())
    }
}

/// Filter criteria plus either `skip`/`limit` (plain listing) or
/// `page`/`size` (paginated listing).
#[derive(Debug, Default, Deserialize)]
pub struct ArtworkFilterQuery {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub artist_id: Option<Id>,
    pub museum_id: Option<Id>,
    pub genre_id: Option<Id>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ArtworkFilterQuery {
    fn filter(&self) -> ArtworkFilter {
        ArtworkFilter {
            min_year: self.min_year,
            max_year: self.max_year,
            artist_id: self.artist_id,
            museum_id: self.museum_id,
            genre_id: self.genre_id,
        }
    }

    fn sort(&self) -> ArtworkSort {
        SortResolver::resolve(self.sort_by.as_deref(), self.sort_order.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MetadataSearchQuery {
    pub pattern: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscountQuery {
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscountResponse {
    pub updated: u64,
}

// Artists

pub async fn create_artist<S: Store>(
    State(catalog): State<AppState<S>>,
    RequestJson(artist): RequestJson<NewArtist>,
) -> Result<(StatusCode, Json<Artist>), (StatusCode, Json<ErrorResponse>)> {
    let artist = catalog.create_artist(artist).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(artist)))
}

pub async fn list_artists<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Artist>> {
    let window = catalog
        .window(query.skip, query.limit)
        .map_err(error_response)?;
    let artists = catalog.list_artists(window).await.map_err(error_response)?;
    Ok(Json(artists))
}

pub async fn get_artist<S: Store>(
    State(catalog): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Artist> {
    let artist = catalog.get_artist(id).await.map_err(error_response)?;
    Ok(Json(artist))
}

// Genres

pub async fn create_genre<S: Store>(
    State(catalog): State<AppState<S>>,
    RequestJson(genre): RequestJson<NewGenre>,
) -> Result<(StatusCode, Json<Genre>), (StatusCode, Json<ErrorResponse>)> {
    let genre = catalog.create_genre(genre).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn list_genres<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Genre>> {
    let window = catalog
        .window(query.skip, query.limit)
        .map_err(error_response)?;
    let genres = catalog.list_genres(window).await.map_err(error_response)?;
    Ok(Json(genres))
}

pub async fn get_genre<S: Store>(
    State(catalog): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Genre> {
    let genre = catalog.get_genre(id).await.map_err(error_response)?;
    Ok(Json(genre))
}

// Museums

pub async fn create_museum<S: Store>(
    State(catalog): State<AppState<S>>,
    RequestJson(museum): RequestJson<NewMuseum>,
) -> Result<(StatusCode, Json<Museum>), (StatusCode, Json<ErrorResponse>)> {
    let museum = catalog.create_museum(museum).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(museum)))
}

pub async fn list_museums<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Museum>> {
    let window = catalog
        .window(query.skip, query.limit)
        .map_err(error_response)?;
    let museums = catalog.list_museums(window).await.map_err(error_response)?;
    Ok(Json(museums))
}

pub async fn get_museum<S: Store>(
    State(catalog): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Museum> {
    let museum = catalog.get_museum(id).await.map_err(error_response)?;
    Ok(Json(museum))
}

// Artworks

pub async fn create_artwork<S: Store>(
    State(catalog): State<AppState<S>>,
    RequestJson(artwork): RequestJson<NewArtwork>,
) -> Result<(StatusCode, Json<Artwork>), (StatusCode, Json<ErrorResponse>)> {
    let artwork = catalog.create_artwork(artwork).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(artwork)))
}

pub async fn get_artwork<S: Store>(
    State(catalog): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Artwork> {
    let artwork = catalog.get_artwork(id).await.map_err(error_response)?;
    Ok(Json(artwork))
}

pub async fn list_artworks<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<ArtworkPageQuery>,
) -> ApiResult<Page<Artwork>> {
    let request = catalog
        .page_request(query.page, query.size)
        .map_err(error_response)?;
    let page = catalog
        .list_artworks(query.sort(), request)
        .await
        .map_err(error_response)?;
    Ok(Json(page))
}

pub async fn filter_artworks<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<ArtworkFilterQuery>,
) -> ApiResult<Vec<Artwork>> {
    let window = catalog
        .window(query.skip, query.limit)
        .map_err(error_response)?;
    let artworks = catalog
        .filter_artworks(&query.filter(), query.sort(), window)
        .await
        .map_err(error_response)?;
    Ok(Json(artworks))
}

pub async fn filter_artworks_paginated<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<ArtworkFilterQuery>,
) -> ApiResult<Page<Artwork>> {
    let request = catalog
        .page_request(query.page, query.size)
        .map_err(error_response)?;
    let page = catalog
        .filter_artworks_paginated(&query.filter(), query.sort(), request)
        .await
        .map_err(error_response)?;
    Ok(Json(page))
}

pub async fn search_artwork_metadata<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<MetadataSearchQuery>,
) -> ApiResult<Page<Artwork>> {
    let request = catalog
        .page_request(query.page, query.size)
        .map_err(error_response)?;
    let pattern = query.pattern.unwrap_or_default();
    let page = catalog
        .search_metadata(&pattern, request)
        .await
        .map_err(error_response)?;
    Ok(Json(page))
}

pub async fn artwork_stats_by_country<S: Store>(
    State(catalog): State<AppState<S>>,
) -> ApiResult<Vec<CountryStats>> {
    let stats = catalog.stats_by_country().await.map_err(error_response)?;
    Ok(Json(stats))
}

pub async fn apply_artwork_discount<S: Store>(
    State(catalog): State<AppState<S>>,
    Query(query): Query<DiscountQuery>,
) -> ApiResult<DiscountResponse> {
    let updated = catalog
        .apply_discount(query.discount_percent)
        .await
        .map_err(error_response)?;
    Ok(Json(DiscountResponse { updated }))
}
