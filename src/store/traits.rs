use crate::logic::filter::Restriction;
use crate::logic::pagination::Window;
use crate::model::{
    Artist, Artwork, ArtworkSort, CountryStats, Genre, Id, Metadata, Museum, NewArtist,
    NewArtwork, NewGenre, NewMuseum,
};
use anyhow::Result;

/// Per-document rewrite used by bulk metadata mutation.
pub trait MetadataRewriter: Send + Sync {
    /// Rewrite the document in place, returning whether it changed.
    fn rewrite(&self, document: &mut Metadata) -> bool;
}

/// Everything the store needs to run one artwork listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkQuery {
    pub restriction: Restriction,
    pub sort: ArtworkSort,
    pub window: Window,
}

#[async_trait::async_trait]
pub trait ArtistStore: Send + Sync {
    async fn get_artist(&self, id: Id) -> Result<Option<Artist>>;
    /// List artists ordered by id
    async fn list_artists(&self, window: Window) -> Result<Vec<Artist>>;
    async fn create_artist(&self, artist: NewArtist) -> Result<Artist>;
}

#[async_trait::async_trait]
pub trait GenreStore: Send + Sync {
    async fn get_genre(&self, id: Id) -> Result<Option<Genre>>;
    async fn list_genres(&self, window: Window) -> Result<Vec<Genre>>;
    async fn create_genre(&self, genre: NewGenre) -> Result<Genre>;
}

#[async_trait::async_trait]
pub trait MuseumStore: Send + Sync {
    async fn get_museum(&self, id: Id) -> Result<Option<Museum>>;
    async fn list_museums(&self, window: Window) -> Result<Vec<Museum>>;
    async fn create_museum(&self, museum: NewMuseum) -> Result<Museum>;
}

#[async_trait::async_trait]
pub trait ArtworkStore: Send + Sync {
    async fn get_artwork(&self, id: Id) -> Result<Option<Artwork>>;
    /// Insert an artwork, stamping `created_at`. Fails if any of the
    /// artist/genre/museum references does not resolve.
    async fn create_artwork(&self, artwork: NewArtwork) -> Result<Artwork>;
    /// Fetch one window of artworks matching the restriction, in sort order
    async fn list_artworks(&self, query: &ArtworkQuery) -> Result<Vec<Artwork>>;
    /// Count artworks matching the restriction
    async fn count_artworks(&self, restriction: &Restriction) -> Result<u64>;
    /// Artwork count and mean year grouped by museum country
    async fn artwork_stats_by_country(&self) -> Result<Vec<CountryStats>>;
    /// Apply `rewriter` to every artwork document as one atomic unit.
    ///
    /// All rows are read under a lock held until the end of the call; changed
    /// documents are written back and committed only if at least one changed.
    /// Returns the number of changed documents.
    async fn rewrite_artwork_metadata(&self, rewriter: &dyn MetadataRewriter) -> Result<u64>;
}

pub trait Store: ArtistStore + GenreStore + MuseumStore + ArtworkStore + Send + Sync {}
