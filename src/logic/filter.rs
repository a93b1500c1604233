use crate::logic::metadata_search::DocumentPattern;
use crate::model::{Artwork, ArtworkFilter, Id};

/// One narrowing condition on artworks.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `year_created >= n`; rows without a year never satisfy it
    MinYear(i32),
    /// `year_created <= n`; rows without a year never satisfy it
    MaxYear(i32),
    ArtistId(Id),
    MuseumId(Id),
    GenreId(Id),
    /// Regex contains-match against the serialized document
    DocumentMatches(DocumentPattern),
}

impl Predicate {
    /// Evaluate the predicate against a single artwork in memory.
    pub fn matches(&self, artwork: &Artwork) -> bool {
        match self {
            Predicate::MinYear(min) => artwork.year_created.is_some_and(|year| year >= *min),
            Predicate::MaxYear(max) => artwork.year_created.is_some_and(|year| year <= *max),
            Predicate::ArtistId(id) => artwork.artist_id == *id,
            Predicate::MuseumId(id) => artwork.museum_id == *id,
            Predicate::GenreId(id) => artwork.genre_id == *id,
            Predicate::DocumentMatches(pattern) => artwork
                .metadata_json
                .as_ref()
                .is_some_and(|document| pattern.is_match(document)),
        }
    }
}

/// Conjunction of predicates. An empty restriction matches every artwork.
///
/// A paginated request hands the same value to both its count and its data
/// query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restriction {
    predicates: Vec<Predicate>,
}

impl Restriction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, artwork: &Artwork) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(artwork))
    }
}

/// Turns optional listing criteria into a restriction.
pub struct FilterBuilder;

impl FilterBuilder {
    pub fn build(filter: &ArtworkFilter) -> Restriction {
        let candidates = [
            filter.min_year.map(Predicate::MinYear),
            filter.max_year.map(Predicate::MaxYear),
            filter.artist_id.map(Predicate::ArtistId),
            filter.museum_id.map(Predicate::MuseumId),
            filter.genre_id.map(Predicate::GenreId),
        ];

        candidates
            .into_iter()
            .flatten()
            .fold(Restriction::new(), Restriction::and)
    }
}
