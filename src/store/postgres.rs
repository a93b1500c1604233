use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Postgres, QueryBuilder, Row,
};

use crate::logic::filter::{Predicate, Restriction};
use crate::logic::pagination::Window;
use crate::model::{
    Artist, Artwork, CountryStats, Genre, Id, Metadata, Museum, NewArtist, NewArtwork, NewGenre,
    NewMuseum,
};
use crate::store::traits::{
    ArtistStore, ArtworkQuery, ArtworkStore, GenreStore, MetadataRewriter, MuseumStore, Store,
};

const ARTWORK_COLUMNS: &str = "id, title, artist_id, genre_id, museum_id, year_created, \
     description, metadata_json, created_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations: catalog tables, the `created_at` backfill and
    /// the trigram index backing metadata search.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn window_bounds(window: Window) -> (i64, i64) {
    let offset = i64::try_from(window.offset).unwrap_or(i64::MAX);
    (i64::from(window.limit), offset)
}

/// Append `AND ...` for each predicate. The builder must already contain a
/// `WHERE` clause.
fn push_restriction(builder: &mut QueryBuilder<'_, Postgres>, restriction: &Restriction) {
    for predicate in restriction.predicates() {
        builder.push(" AND ");
        match predicate {
            Predicate::MinYear(year) => {
                builder.push("year_created >= ").push_bind(*year);
            }
            Predicate::MaxYear(year) => {
                builder.push("year_created <= ").push_bind(*year);
            }
            Predicate::ArtistId(id) => {
                builder.push("artist_id = ").push_bind(*id);
            }
            Predicate::MuseumId(id) => {
                builder.push("museum_id = ").push_bind(*id);
            }
            Predicate::GenreId(id) => {
                builder.push("genre_id = ").push_bind(*id);
            }
            Predicate::DocumentMatches(pattern) => {
                // Served by ix_artworks_metadata_json_trgm
                builder
                    .push("metadata_json::text ~ ")
                    .push_bind(pattern.as_str().to_string());
            }
        }
    }
}

fn document_from_value(value: Option<Value>) -> Option<Metadata> {
    match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn artwork_from_row(row: &PgRow) -> Artwork {
    Artwork {
        id: row.get("id"),
        title: row.get("title"),
        artist_id: row.get("artist_id"),
        genre_id: row.get("genre_id"),
        museum_id: row.get("museum_id"),
        year_created: row.get("year_created"),
        description: row.get("description"),
        metadata_json: document_from_value(row.get("metadata_json")),
        created_at: row.get("created_at"),
    }
}

fn artist_from_row(row: &PgRow) -> Artist {
    Artist {
        id: row.get("id"),
        name: row.get("name"),
        country: row.get("country"),
        birth_year: row.get("birth_year"),
        death_year: row.get("death_year"),
    }
}

fn genre_from_row(row: &PgRow) -> Genre {
    Genre {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
    }
}

fn museum_from_row(row: &PgRow) -> Museum {
    Museum {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        country: row.get("country"),
    }
}

#[async_trait::async_trait]
impl ArtistStore for PostgresStore {
    async fn get_artist(&self, id: Id) -> Result<Option<Artist>> {
        let row = sqlx::query(
            "SELECT id, name, country, birth_year, death_year FROM artists WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch artist")?;

        Ok(row.as_ref().map(artist_from_row))
    }

    async fn list_artists(&self, window: Window) -> Result<Vec<Artist>> {
        let (limit, offset) = window_bounds(window);
        let rows = sqlx::query(
            "SELECT id, name, country, birth_year, death_year FROM artists \
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list artists")?;

        Ok(rows.iter().map(artist_from_row).collect())
    }

    async fn create_artist(&self, artist: NewArtist) -> Result<Artist> {
        let row = sqlx::query(
            r#"
            INSERT INTO artists (name, country, birth_year, death_year)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, country, birth_year, death_year
            "#,
        )
        .bind(&artist.name)
        .bind(&artist.country)
        .bind(artist.birth_year)
        .bind(artist.death_year)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create artist")?;

        Ok(artist_from_row(&row))
    }
}

#[async_trait::async_trait]
impl GenreStore for PostgresStore {
    async fn get_genre(&self, id: Id) -> Result<Option<Genre>> {
        let row = sqlx::query("SELECT id, name, description FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch genre")?;

        Ok(row.as_ref().map(genre_from_row))
    }

    async fn list_genres(&self, window: Window) -> Result<Vec<Genre>> {
        let (limit, offset) = window_bounds(window);
        let rows =
            sqlx::query("SELECT id, name, description FROM genres ORDER BY id LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .context("Failed to list genres")?;

        Ok(rows.iter().map(genre_from_row).collect())
    }

    async fn create_genre(&self, genre: NewGenre) -> Result<Genre> {
        let row = sqlx::query(
            "INSERT INTO genres (name, description) VALUES ($1, $2) \
             RETURNING id, name, description",
        )
        .bind(&genre.name)
        .bind(&genre.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create genre")?;

        Ok(genre_from_row(&row))
    }
}

#[async_trait::async_trait]
impl MuseumStore for PostgresStore {
    async fn get_museum(&self, id: Id) -> Result<Option<Museum>> {
        let row = sqlx::query("SELECT id, name, city, country FROM museums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch museum")?;

        Ok(row.as_ref().map(museum_from_row))
    }

    async fn list_museums(&self, window: Window) -> Result<Vec<Museum>> {
        let (limit, offset) = window_bounds(window);
        let rows = sqlx::query(
            "SELECT id, name, city, country FROM museums ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list museums")?;

        Ok(rows.iter().map(museum_from_row).collect())
    }

    async fn create_museum(&self, museum: NewMuseum) -> Result<Museum> {
        let row = sqlx::query(
            "INSERT INTO museums (name, city, country) VALUES ($1, $2, $3) \
             RETURNING id, name, city, country",
        )
        .bind(&museum.name)
        .bind(&museum.city)
        .bind(&museum.country)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create museum")?;

        Ok(museum_from_row(&row))
    }
}

#[async_trait::async_trait]
impl ArtworkStore for PostgresStore {
    async fn get_artwork(&self, id: Id) -> Result<Option<Artwork>> {
        let sql = format!("SELECT {} FROM artworks WHERE id = $1", ARTWORK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch artwork")?;

        Ok(row.as_ref().map(artwork_from_row))
    }

    async fn create_artwork(&self, artwork: NewArtwork) -> Result<Artwork> {
        let sql = format!(
            r#"
            INSERT INTO artworks (title, artist_id, genre_id, museum_id, year_created, description, metadata_json)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ARTWORK_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&artwork.title)
            .bind(artwork.artist_id)
            .bind(artwork.genre_id)
            .bind(artwork.museum_id)
            .bind(artwork.year_created)
            .bind(&artwork.description)
            .bind(artwork.metadata_json.map(Value::Object))
            .fetch_one(&self.pool)
            .await
            .context("Failed to create artwork")?;

        Ok(artwork_from_row(&row))
    }

    async fn list_artworks(&self, query: &ArtworkQuery) -> Result<Vec<Artwork>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM artworks WHERE 1=1",
            ARTWORK_COLUMNS
        ));
        push_restriction(&mut builder, &query.restriction);

        // Ties fall back to id order, as in the in-memory store
        builder.push(format!(
            " ORDER BY {} {}, id",
            query.sort.field.order_expression(),
            query.sort.direction.keyword()
        ));

        let (limit, offset) = window_bounds(query.window);
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list artworks")?;

        Ok(rows.iter().map(artwork_from_row).collect())
    }

    async fn count_artworks(&self, restriction: &Restriction) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM artworks WHERE 1=1");
        push_restriction(&mut builder, restriction);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count artworks")?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn artwork_stats_by_country(&self) -> Result<Vec<CountryStats>> {
        let rows = sqlx::query(
            r#"
            SELECT m.country AS country,
                   COUNT(a.id) AS artwork_count,
                   AVG(a.year_created)::float8 AS average_year
            FROM artworks a
            JOIN museums m ON m.id = a.museum_id
            GROUP BY m.country
            ORDER BY m.country
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate artworks by country")?;

        let stats = rows
            .iter()
            .map(|row| {
                let count: i64 = row.get("artwork_count");
                CountryStats {
                    country: row.get("country"),
                    artwork_count: u64::try_from(count).unwrap_or_default(),
                    average_year: row.get("average_year"),
                }
            })
            .collect();

        Ok(stats)
    }

    async fn rewrite_artwork_metadata(&self, rewriter: &dyn MetadataRewriter) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .context("Failed to set transaction isolation")?;

        let rows = sqlx::query(
            "SELECT id, metadata_json FROM artworks \
             WHERE metadata_json IS NOT NULL ORDER BY id FOR UPDATE",
        )
        .fetch_all(&mut *tx)
        .await
        .context("Failed to lock artworks")?;

        let mut staged: Vec<(Id, Metadata)> = Vec::new();
        for row in &rows {
            let Some(mut document) = document_from_value(row.get("metadata_json")) else {
                continue;
            };
            if rewriter.rewrite(&mut document) {
                staged.push((row.get("id"), document));
            }
        }

        if staged.is_empty() {
            tx.rollback()
                .await
                .context("Failed to release artwork locks")?;
            return Ok(0);
        }

        // Dropping `tx` on an early return rolls everything back
        for (id, document) in &staged {
            sqlx::query("UPDATE artworks SET metadata_json = $1 WHERE id = $2")
                .bind(Value::Object(document.clone()))
                .bind(*id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to update metadata of artwork {}", id))?;
        }

        tx.commit()
            .await
            .context("Failed to commit metadata rewrite")?;

        Ok(staged.len() as u64)
    }
}

impl Store for PostgresStore {}
