use anyhow::{bail, Result};
use chrono::Utc;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::logic::aggregation::summarize_by_country;
use crate::logic::filter::{Predicate, Restriction};
use crate::logic::pagination::Window;
use crate::model::{
    Artist, Artwork, ArtworkSort, CountryStats, Genre, Id, Metadata, Museum, NewArtist,
    NewArtwork, NewGenre, NewMuseum, SortDirection, SortField,
};
use crate::store::traits::{
    ArtistStore, ArtworkQuery, ArtworkStore, GenreStore, MetadataRewriter, MuseumStore, Store,
};

#[derive(Debug, Default)]
struct Tables {
    artists: BTreeMap<Id, Artist>,
    genres: BTreeMap<Id, Genre>,
    museums: BTreeMap<Id, Museum>,
    artworks: BTreeMap<Id, Artwork>,
}

/// Process-local store with the same query semantics as `PostgresStore`.
///
/// Rows live in id order. Every operation holds the table lock for its whole
/// duration, which makes metadata rewrites atomic with respect to inserts and
/// other rewrites.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<V>(rows: &BTreeMap<Id, V>) -> Id {
    rows.keys().next_back().map_or(1, |last| last + 1)
}

fn window_of<'a, T: Clone + 'a>(rows: impl Iterator<Item = &'a T>, window: Window) -> Vec<T> {
    let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
    rows.skip(offset).take(window.limit as usize).cloned().collect()
}

/// Postgres orders NULL above every value, so nulls trail an ascending sort
/// and lead a descending one.
fn compare_nullable(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// Document patterns are only checked for in-process evaluability here, so a
/// pattern Postgres would run but `regex` cannot is an input error.
fn ensure_evaluable(restriction: &Restriction) -> Result<()> {
    for predicate in restriction.predicates() {
        if let Predicate::DocumentMatches(pattern) = predicate {
            pattern.regex()?;
        }
    }
    Ok(())
}

fn sort_artworks(artworks: &mut [Artwork], sort: ArtworkSort) {
    artworks.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Year => compare_nullable(a.year_created, b.year_created),
            SortField::Title => a.title.cmp(&b.title),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[async_trait::async_trait]
impl ArtistStore for InMemoryStore {
    async fn get_artist(&self, id: Id) -> Result<Option<Artist>> {
        Ok(self.tables.read().artists.get(&id).cloned())
    }

    async fn list_artists(&self, window: Window) -> Result<Vec<Artist>> {
        Ok(window_of(self.tables.read().artists.values(), window))
    }

    async fn create_artist(&self, artist: NewArtist) -> Result<Artist> {
        let mut tables = self.tables.write();
        let artist = artist.into_artist(next_id(&tables.artists));
        tables.artists.insert(artist.id, artist.clone());
        Ok(artist)
    }
}

#[async_trait::async_trait]
impl GenreStore for InMemoryStore {
    async fn get_genre(&self, id: Id) -> Result<Option<Genre>> {
        Ok(self.tables.read().genres.get(&id).cloned())
    }

    async fn list_genres(&self, window: Window) -> Result<Vec<Genre>> {
        Ok(window_of(self.tables.read().genres.values(), window))
    }

    async fn create_genre(&self, genre: NewGenre) -> Result<Genre> {
        let mut tables = self.tables.write();
        let genre = genre.into_genre(next_id(&tables.genres));
        tables.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }
}

#[async_trait::async_trait]
impl MuseumStore for InMemoryStore {
    async fn get_museum(&self, id: Id) -> Result<Option<Museum>> {
        Ok(self.tables.read().museums.get(&id).cloned())
    }

    async fn list_museums(&self, window: Window) -> Result<Vec<Museum>> {
        Ok(window_of(self.tables.read().museums.values(), window))
    }

    async fn create_museum(&self, museum: NewMuseum) -> Result<Museum> {
        let mut tables = self.tables.write();
        let museum = museum.into_museum(next_id(&tables.museums));
        tables.museums.insert(museum.id, museum.clone());
        Ok(museum)
    }
}

#[async_trait::async_trait]
impl ArtworkStore for InMemoryStore {
    async fn get_artwork(&self, id: Id) -> Result<Option<Artwork>> {
        Ok(self.tables.read().artworks.get(&id).cloned())
    }

    async fn create_artwork(&self, artwork: NewArtwork) -> Result<Artwork> {
        let mut tables = self.tables.write();

        if !tables.artists.contains_key(&artwork.artist_id) {
            bail!("foreign key violation: artist {} does not exist", artwork.artist_id);
        }
        if !tables.genres.contains_key(&artwork.genre_id) {
            bail!("foreign key violation: genre {} does not exist", artwork.genre_id);
        }
        if !tables.museums.contains_key(&artwork.museum_id) {
            bail!("foreign key violation: museum {} does not exist", artwork.museum_id);
        }

        let artwork = artwork.into_artwork(next_id(&tables.artworks), Utc::now());
        tables.artworks.insert(artwork.id, artwork.clone());
        Ok(artwork)
    }

    async fn list_artworks(&self, query: &ArtworkQuery) -> Result<Vec<Artwork>> {
        ensure_evaluable(&query.restriction)?;

        let mut matching: Vec<Artwork> = {
            let tables = self.tables.read();
            tables
                .artworks
                .values()
                .filter(|artwork| query.restriction.matches(artwork))
                .cloned()
                .collect()
        };

        sort_artworks(&mut matching, query.sort);
        Ok(window_of(matching.iter(), query.window))
    }

    async fn count_artworks(&self, restriction: &Restriction) -> Result<u64> {
        ensure_evaluable(restriction)?;

        let tables = self.tables.read();
        let count = tables
            .artworks
            .values()
            .filter(|artwork| restriction.matches(artwork))
            .count();
        Ok(count as u64)
    }

    async fn artwork_stats_by_country(&self) -> Result<Vec<CountryStats>> {
        let tables = self.tables.read();
        let rows = tables.artworks.values().filter_map(|artwork| {
            tables
                .museums
                .get(&artwork.museum_id)
                .map(|museum| (museum.country.clone(), artwork.year_created))
        });
        Ok(summarize_by_country(rows))
    }

    async fn rewrite_artwork_metadata(&self, rewriter: &dyn MetadataRewriter) -> Result<u64> {
        let mut tables = self.tables.write();

        let staged: Vec<(Id, Metadata)> = tables
            .artworks
            .values()
            .filter_map(|artwork| {
                let mut document = artwork.metadata_json.clone()?;
                rewriter
                    .rewrite(&mut document)
                    .then_some((artwork.id, document))
            })
            .collect();

        for (id, document) in &staged {
            if let Some(artwork) = tables.artworks.get_mut(id) {
                artwork.metadata_json = Some(document.clone());
            }
        }

        Ok(staged.len() as u64)
    }
}

impl Store for InMemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::logic::filter::Predicate;
    use crate::logic::metadata_search::DocumentPattern;
    use serde_json::{json, Value};

    fn document(value: Value) -> Option<Metadata> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .create_artist(NewArtist {
                name: "Rembrandt".to_string(),
                country: Some("Netherlands".to_string()),
                birth_year: Some(1606),
                death_year: Some(1669),
            })
            .await
            .unwrap();
        store
            .create_genre(NewGenre {
                name: "Portrait".to_string(),
                description: None,
            })
            .await
            .unwrap();
        store
            .create_museum(NewMuseum {
                name: "Rijksmuseum".to_string(),
                city: Some("Amsterdam".to_string()),
                country: Some("Netherlands".to_string()),
            })
            .await
            .unwrap();

        for (title, year, metadata) in [
            ("B", Some(1642), json!({"style": "oil", "estimated_value_usd": 2000000})),
            ("A", None, json!({"style": "etching"})),
            ("C", Some(1630), Value::Null),
        ] {
            store
                .create_artwork(NewArtwork {
                    title: title.to_string(),
                    artist_id: 1,
                    genre_id: 1,
                    museum_id: 1,
                    year_created: year,
                    description: None,
                    metadata_json: document(metadata),
                })
                .await
                .unwrap();
        }
        store
    }

    fn query(restriction: Restriction, field: SortField, direction: SortDirection) -> ArtworkQuery {
        ArtworkQuery {
            restriction,
            sort: ArtworkSort::new(field, direction),
            window: Window { offset: 0, limit: 100 },
        }
    }

    #[tokio::test]
    async fn test_title_sort_is_bytewise() {
        let store = seeded().await;
        for title in ["apple", "Banana"] {
            store
                .create_artwork(NewArtwork {
                    title: title.to_string(),
                    artist_id: 1,
                    genre_id: 1,
                    museum_id: 1,
                    year_created: None,
                    description: None,
                    metadata_json: None,
                })
                .await
                .unwrap();
        }

        let listed = store
            .list_artworks(&query(Restriction::new(), SortField::Title, SortDirection::Asc))
            .await
            .unwrap();
        let titles: Vec<&str> = listed.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "Banana", "C", "apple"]);
    }

    #[tokio::test]
    async fn test_sort_ties_fall_back_to_id() {
        let store = seeded().await;
        for _ in 0..2 {
            store
                .create_artwork(NewArtwork {
                    title: "Twin".to_string(),
                    artist_id: 1,
                    genre_id: 1,
                    museum_id: 1,
                    year_created: Some(1642),
                    description: None,
                    metadata_json: None,
                })
                .await
                .unwrap();
        }

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let listed = store
                .list_artworks(&query(Restriction::new(), SortField::Year, direction))
                .await
                .unwrap();
            let tied: Vec<Id> = listed
                .iter()
                .filter(|a| a.year_created == Some(1642))
                .map(|a| a.id)
                .collect();
            assert_eq!(tied, vec![1, 4, 5]);
        }
    }

    #[tokio::test]
    async fn test_unevaluable_pattern_is_input_error() {
        let store = seeded().await;
        let restriction = DocumentPattern::parse(r"(o)\1").unwrap().into_restriction();

        let err = store.count_artworks(&restriction).await.unwrap_err();
        assert!(matches!(
            CatalogError::from_store(err),
            CatalogError::InvalidInput(_)
        ));
        let err = store
            .list_artworks(&query(restriction, SortField::Id, SortDirection::Asc))
            .await
            .unwrap_err();
        assert!(matches!(
            CatalogError::from_store(err),
            CatalogError::InvalidInput(_)
        ));
    }

    struct MarkAll;

    impl MetadataRewriter for MarkAll {
        fn rewrite(&self, document: &mut Metadata) -> bool {
            document.insert("seen".to_string(), Value::Bool(true));
            true
        }
    }

    struct MarkNone;

    impl MetadataRewriter for MarkNone {
        fn rewrite(&self, _document: &mut Metadata) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = seeded().await;
        let ids: Vec<Id> = store
            .list_artworks(&query(Restriction::new(), SortField::Id, SortDirection::Asc))
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_dangling_reference_rejected() {
        let store = seeded().await;
        let result = store
            .create_artwork(NewArtwork {
                title: "Orphan".to_string(),
                artist_id: 1,
                genre_id: 1,
                museum_id: 99,
                year_created: None,
                description: None,
                metadata_json: None,
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.count_artworks(&Restriction::new()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_year_sort_places_nulls_like_postgres() {
        let store = seeded().await;
        let asc: Vec<Id> = store
            .list_artworks(&query(Restriction::new(), SortField::Year, SortDirection::Asc))
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(asc, vec![3, 1, 2]);

        let desc: Vec<Id> = store
            .list_artworks(&query(Restriction::new(), SortField::Year, SortDirection::Desc))
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(desc, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_window_and_count_share_restriction() {
        let store = seeded().await;
        let restriction = Restriction::new().and(Predicate::MinYear(1600));
        assert_eq!(store.count_artworks(&restriction).await.unwrap(), 2);

        let mut q = query(restriction, SortField::Title, SortDirection::Asc);
        q.window = Window { offset: 1, limit: 5 };
        let titles: Vec<String> = store
            .list_artworks(&q)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["C".to_string()]);
    }

    #[tokio::test]
    async fn test_rewrite_skips_documentless_rows() {
        let store = seeded().await;
        assert_eq!(store.rewrite_artwork_metadata(&MarkAll).await.unwrap(), 2);

        let untouched = store.get_artwork(3).await.unwrap().unwrap();
        assert_eq!(untouched.metadata_json, None);
        let touched = store.get_artwork(2).await.unwrap().unwrap();
        assert_eq!(touched.metadata_json.unwrap()["seen"], json!(true));
    }

    #[tokio::test]
    async fn test_rewrite_without_changes_writes_nothing() {
        let store = seeded().await;
        let before = store.get_artwork(1).await.unwrap();
        assert_eq!(store.rewrite_artwork_metadata(&MarkNone).await.unwrap(), 0);
        assert_eq!(store.get_artwork(1).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_stats_join_museum_country() {
        let store = seeded().await;
        let stats = store.artwork_stats_by_country().await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].country.as_deref(), Some("Netherlands"));
        assert_eq!(stats[0].artwork_count, 3);
        assert_eq!(stats[0].average_year, Some(1636.0));
    }
}
