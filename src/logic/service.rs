use std::sync::Arc;

use crate::config::QueryConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::logic::aggregation::sort_by_country;
use crate::logic::discount::DiscountCampaign;
use crate::logic::filter::{FilterBuilder, Restriction};
use crate::logic::metadata_search::DocumentPattern;
use crate::logic::pagination::{PageRequest, Pagination, Window};
use crate::model::{
    Artist, Artwork, ArtworkFilter, ArtworkSort, CountryStats, Genre, Id, Museum, NewArtist,
    NewArtwork, NewGenre, NewMuseum, Page,
};
use crate::store::traits::{ArtworkQuery, Store};

/// Catalog operations composed over a store.
///
/// Each method is one self-contained request: inputs are validated before
/// the store is touched, and store failures come back as
/// `CatalogError::Store`.
#[derive(Debug)]
pub struct CatalogService<S> {
    store: Arc<S>,
    limits: QueryConfig,
}

impl<S> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            limits: self.limits.clone(),
        }
    }
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: Arc<S>, limits: QueryConfig) -> Self {
        Self { store, limits }
    }

    /// Validate `page`/`size` query parameters, applying configured defaults.
    pub fn page_request(&self, page: Option<u32>, size: Option<u32>) -> CatalogResult<PageRequest> {
        PageRequest::new(
            page.unwrap_or(1),
            size.unwrap_or(self.limits.default_page_size),
            self.limits.max_page_size,
        )
    }

    /// Validate `skip`/`limit` query parameters, applying configured defaults.
    pub fn window(&self, skip: Option<u64>, limit: Option<u32>) -> CatalogResult<Window> {
        Window::new(
            skip.unwrap_or(0),
            limit.unwrap_or(self.limits.default_page_size),
            self.limits.max_page_size,
        )
    }

    // Artists

    pub async fn create_artist(&self, artist: NewArtist) -> CatalogResult<Artist> {
        artist.validate()?;
        let artist = self
            .store
            .create_artist(artist)
            .await
            .map_err(CatalogError::from_store)?;
        log::info!("Created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub async fn get_artist(&self, id: Id) -> CatalogResult<Artist> {
        self.store
            .get_artist(id)
            .await
            .map_err(CatalogError::from_store)?
            .ok_or_else(|| CatalogError::not_found(format!("artist {}", id)))
    }

    pub async fn list_artists(&self, window: Window) -> CatalogResult<Vec<Artist>> {
        self.store
            .list_artists(window)
            .await
            .map_err(CatalogError::from_store)
    }

    // Genres

    pub async fn create_genre(&self, genre: NewGenre) -> CatalogResult<Genre> {
        genre.validate()?;
        let genre = self
            .store
            .create_genre(genre)
            .await
            .map_err(CatalogError::from_store)?;
        log::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    pub async fn get_genre(&self, id: Id) -> CatalogResult<Genre> {
        self.store
            .get_genre(id)
            .await
            .map_err(CatalogError::from_store)?
            .ok_or_else(|| CatalogError::not_found(format!("genre {}", id)))
    }

    pub async fn list_genres(&self, window: Window) -> CatalogResult<Vec<Genre>> {
        self.store
            .list_genres(window)
            .await
            .map_err(CatalogError::from_store)
    }

    // Museums

    pub async fn create_museum(&self, museum: NewMuseum) -> CatalogResult<Museum> {
        museum.validate()?;
        let museum = self
            .store
            .create_museum(museum)
            .await
            .map_err(CatalogError::from_store)?;
        log::info!("Created museum {} ({})", museum.id, museum.name);
        Ok(museum)
    }

    pub async fn get_museum(&self, id: Id) -> CatalogResult<Museum> {
        self.store
            .get_museum(id)
            .await
            .map_err(CatalogError::from_store)?
            .ok_or_else(|| CatalogError::not_found(format!("museum {}", id)))
    }

    pub async fn list_museums(&self, window: Window) -> CatalogResult<Vec<Museum>> {
        self.store
            .list_museums(window)
            .await
            .map_err(CatalogError::from_store)
    }

    // Artworks

    pub async fn create_artwork(&self, artwork: NewArtwork) -> CatalogResult<Artwork> {
        artwork.validate()?;
        let artwork = self
            .store
            .create_artwork(artwork)
            .await
            .map_err(CatalogError::from_store)?;
        log::info!("Created artwork {} ({})", artwork.id, artwork.title);
        Ok(artwork)
    }

    pub async fn get_artwork(&self, id: Id) -> CatalogResult<Artwork> {
        self.store
            .get_artwork(id)
            .await
            .map_err(CatalogError::from_store)?
            .ok_or_else(|| CatalogError::not_found(format!("artwork {}", id)))
    }

    /// General listing: every artwork, sorted, one page at a time.
    pub async fn list_artworks(
        &self,
        sort: ArtworkSort,
        request: PageRequest,
    ) -> CatalogResult<Page<Artwork>> {
        self.paginate(Restriction::new(), sort, request).await
    }

    /// Filtered listing over a raw `skip`/`limit` window.
    pub async fn filter_artworks(
        &self,
        filter: &ArtworkFilter,
        sort: ArtworkSort,
        window: Window,
    ) -> CatalogResult<Vec<Artwork>> {
        let query = ArtworkQuery {
            restriction: FilterBuilder::build(filter),
            sort,
            window,
        };
        log::debug!("Filtering artworks: {:?}", query);

        self.store
            .list_artworks(&query)
            .await
            .map_err(CatalogError::from_store)
    }

    /// Filtered listing wrapped in the pagination envelope.
    pub async fn filter_artworks_paginated(
        &self,
        filter: &ArtworkFilter,
        sort: ArtworkSort,
        request: PageRequest,
    ) -> CatalogResult<Page<Artwork>> {
        self.paginate(FilterBuilder::build(filter), sort, request)
            .await
    }

    /// Artworks whose serialized document contains a match for `pattern`,
    /// ordered by id.
    pub async fn search_metadata(
        &self,
        pattern: &str,
        request: PageRequest,
    ) -> CatalogResult<Page<Artwork>> {
        let pattern = DocumentPattern::parse(pattern)?;
        log::debug!("Searching artwork metadata for /{}/", pattern.as_str());

        self.paginate(pattern.into_restriction(), ArtworkSort::by_id(), request)
            .await
    }

    /// Artwork count and mean year per museum country.
    pub async fn stats_by_country(&self) -> CatalogResult<Vec<CountryStats>> {
        let mut stats = self
            .store
            .artwork_stats_by_country()
            .await
            .map_err(CatalogError::from_store)?;
        sort_by_country(&mut stats);
        Ok(stats)
    }

    /// Run one discount campaign over every artwork, returning how many were
    /// discounted. Falls back to the configured default percent.
    pub async fn apply_discount(&self, discount_percent: Option<f64>) -> CatalogResult<u64> {
        let campaign = DiscountCampaign::new(
            discount_percent.unwrap_or(self.limits.default_discount_percent),
        )?;

        let updated = self
            .store
            .rewrite_artwork_metadata(&campaign)
            .await
            .map_err(CatalogError::from_store)?;

        log::info!(
            "Discount campaign at {}% updated {} artworks",
            campaign.percent(),
            updated
        );
        Ok(updated)
    }

    /// Count, then fetch the page, using the same restriction for both.
    async fn paginate(
        &self,
        restriction: Restriction,
        sort: ArtworkSort,
        request: PageRequest,
    ) -> CatalogResult<Page<Artwork>> {
        let total = self
            .store
            .count_artworks(&restriction)
            .await
            .map_err(CatalogError::from_store)?;
        let pagination = Pagination::compute(total, request);

        let query = ArtworkQuery {
            restriction,
            sort,
            window: request.window(),
        };
        let data = self
            .store
            .list_artworks(&query)
            .await
            .map_err(CatalogError::from_store)?;

        Ok(pagination.into_page(data))
    }
}
