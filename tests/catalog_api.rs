use art_catalog::build_app;
use art_catalog::config::QueryConfig;
use art_catalog::store::InMemoryStore;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// In-process client wrapper for driving the router
struct TestClient {
    app: Router,
}

impl TestClient {
    fn new() -> Self {
        Self {
            app: build_app(Arc::new(InMemoryStore::new()), QueryConfig::default()),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    async fn post(&self, path: &str, json: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn post_empty(&self, path: &str) -> (StatusCode, Value) {
        self.send(Request::post(path).body(Body::empty()).unwrap())
            .await
    }
}

/// Seed two countries' worth of catalog through the API.
async fn seed(client: &TestClient) {
    let (status, _) = client
        .post("/artists", json!({"name": "Vincent van Gogh", "country": "Netherlands", "birth_year": 1853, "death_year": 1890}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    client
        .post("/artists", json!({"name": "Frida Kahlo", "country": "Mexico", "birth_year": 1907}))
        .await;
    client
        .post("/genres", json!({"name": "Post-Impressionism"}))
        .await;
    client
        .post("/genres", json!({"name": "Surrealism", "description": "Dream imagery"}))
        .await;
    client
        .post("/museums", json!({"name": "Van Gogh Museum", "city": "Amsterdam", "country": "Netherlands"}))
        .await;
    client
        .post("/museums", json!({"name": "Museo Frida Kahlo", "city": "Mexico City", "country": "Mexico"}))
        .await;
    client
        .post("/museums", json!({"name": "Empty Hall", "country": "Belgium"}))
        .await;

    let artworks = [
        json!({"title": "Sunflowers", "artist_id": 1, "genre_id": 1, "museum_id": 1, "year_created": 1888,
               "metadata_json": {"style": "oil", "is_famous": true, "estimated_value_usd": 2000000}}),
        json!({"title": "The Potato Eaters", "artist_id": 1, "genre_id": 1, "museum_id": 1, "year_created": 1885,
               "metadata_json": {"style": "oil", "estimated_value_usd": 500000}}),
        json!({"title": "Almond Blossom", "artist_id": 1, "genre_id": 1, "museum_id": 1,
               "metadata_json": {"style": "oil", "estimated_value_usd": "priceless"}}),
        json!({"title": "Viva la Vida", "artist_id": 2, "genre_id": 2, "museum_id": 2, "year_created": 1954,
               "metadata_json": {"style": "oil on masonite", "size_cm": "59.5x50.8"}}),
        json!({"title": "Sketchbook", "artist_id": 2, "genre_id": 2, "museum_id": 2}),
    ];
    for artwork in artworks {
        let (status, body) = client.post("/artworks", artwork).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }
}

#[tokio::test]
async fn test_health() {
    let client = TestClient::new();
    let (status, body) = client.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_reference_entities_roundtrip() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, artist) = client.get("/artists/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(artist["name"], "Frida Kahlo");
    assert_eq!(artist["death_year"], Value::Null);

    let (_, museums) = client.get("/museums?skip=1&limit=1").await;
    assert_eq!(museums.as_array().unwrap().len(), 1);
    assert_eq!(museums[0]["name"], "Museo Frida Kahlo");

    let (status, _) = client.get("/genres/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = client.post("/artists", json!({"name": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_artwork_representation() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, artwork) = client.get("/artworks/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(artwork["title"], "Sunflowers");
    assert_eq!(artwork["metadata_json"]["style"], "oil");
    assert!(artwork["created_at"].is_string());

    let (status, _) = client.get("/artworks/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client
        .post("/artworks", json!({"title": "Ghost", "artist_id": 9, "genre_id": 1, "museum_id": 1}))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_general_listing_envelope() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, page) = client
        .get("/artworks?page=2&size=2&sort_by=title&sort_order=ASC")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["size"], 2);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["has_next"], true);
    assert_eq!(page["has_prev"], true);
    let titles: Vec<&str> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sunflowers", "The Potato Eaters"]);

    let (_, unknown) = client.get("/artworks?sort_by=bogus&sort_order=desc").await;
    let (_, by_id) = client.get("/artworks?sort_by=id&sort_order=desc").await;
    assert_eq!(unknown, by_id);
    assert_eq!(by_id["data"][0]["id"], 5);
}

#[tokio::test]
async fn test_page_bounds_rejected() {
    let client = TestClient::new();
    for path in [
        "/artworks?page=0",
        "/artworks?size=0",
        "/artworks?size=101",
        "/artworks/filter?limit=500",
        "/artworks/search/metadata?pattern=oil&size=1000",
    ] {
        let (status, _) = client.get(path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
    }
}

#[tokio::test]
async fn test_filtered_listing() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, artworks) = client
        .get("/artworks/filter?artist_id=1&min_year=1886&sort_by=year")
        .await;
    assert_eq!(status, StatusCode::OK);
    let artworks = artworks.as_array().unwrap();
    assert_eq!(artworks.len(), 1);
    assert_eq!(artworks[0]["title"], "Sunflowers");

    // an id of zero narrows to nothing rather than lifting the filter
    let (_, none) = client.get("/artworks/filter?museum_id=0").await;
    assert!(none.as_array().unwrap().is_empty());

    let (_, all) = client.get("/artworks/filter").await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, page) = client
        .get("/artworks/filter/paginated?genre_id=2&page=1&size=1&sort_by=year&sort_order=desc")
        .await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["has_next"], true);
    assert_eq!(page["has_prev"], false);
    // descending puts the undated sketchbook first
    assert_eq!(page["data"][0]["title"], "Sketchbook");
}

#[tokio::test]
async fn test_metadata_search() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, page) = client.get("/artworks/search/metadata?pattern=oil").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 4);
    let ids: Vec<i64> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let (_, famous) = client.get("/artworks/search/metadata?pattern=true").await;
    assert_eq!(famous["total"], 1);
    assert_eq!(famous["data"][0]["title"], "Sunflowers");

    // shorter keys render first, so style is always followed by a comma here
    let (_, exact) = client
        .get("/artworks/search/metadata?pattern=%22style%22%3A%20%22oil%22%2C")
        .await;
    assert_eq!(exact["total"], 3);

    let (_, none) = client.get("/artworks/search/metadata?pattern=zzzznomatch").await;
    assert_eq!(none["total"], 0);
    assert_eq!(none["total_pages"], 0);
    assert_eq!(none["data"], json!([]));

    let (status, body) = client.get("/artworks/search/metadata?pattern=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pattern"));

    let (status, _) = client.get("/artworks/search/metadata").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metadata_search_json_structure() {
    let client = TestClient::new();
    seed(&client).await;
    let (status, _) = client
        .post(
            "/artworks",
            json!({"title": "Self-Portrait with Monkey", "artist_id": 2, "genre_id": 2, "museum_id": 2,
                   "metadata_json": {"style": "tempera", "size_cm": {"w": 60, "h": 50}}}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // `"size_cm": {` only hits the nested object, not the string size
    let (status, nested) = client
        .get("/artworks/search/metadata?pattern=%22size_cm%22%3A%20%7B")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nested["total"], 1);
    assert_eq!(nested["data"][0]["title"], "Self-Portrait with Monkey");

    let (status, leading) = client
        .get("/artworks/search/metadata?pattern=%7B%22style%22")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(leading["total"], 5);

    let (status, bounded) = client
        .get("/artworks/search/metadata?pattern=te%7B%2C1%7Dmpera")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bounded["total"], 1);

    // backreferences only run in Postgres
    let (status, body) = client
        .get("/artworks/search/metadata?pattern=%28o%29%5C1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pattern"));
}

#[tokio::test]
async fn test_stats_by_country() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, stats) = client.get("/artworks/stats/by-country").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!([
            {"country": "Mexico", "artwork_count": 2, "average_year": 1954.0},
            {"country": "Netherlands", "artwork_count": 3, "average_year": 1886.5}
        ])
    );
}

#[tokio::test]
async fn test_discount_campaign() {
    let client = TestClient::new();
    seed(&client).await;

    let (status, body) = client.post_empty("/artworks/discount?discount_percent=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, sunflowers) = client.get("/artworks/1").await;
    let value = sunflowers["metadata_json"]["estimated_value_usd"].as_f64().unwrap();
    assert!((value - 1_800_000.0).abs() < 1e-6);
    assert_eq!(sunflowers["metadata_json"]["has_discount"], true);
    assert_eq!(sunflowers["metadata_json"]["discount_percent"], 10.0);

    // second run re-discounts
    let (_, body) = client.post_empty("/artworks/discount").await;
    assert_eq!(body["updated"], 1);
    let (_, sunflowers) = client.get("/artworks/1").await;
    let value = sunflowers["metadata_json"]["estimated_value_usd"].as_f64().unwrap();
    assert!((value - 1_620_000.0).abs() < 1e-6);

    let (_, eaters) = client.get("/artworks/2").await;
    assert_eq!(eaters["metadata_json"], json!({"style": "oil", "estimated_value_usd": 500000}));

    let (status, _) = client.post_empty("/artworks/discount?discount_percent=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = client.post_empty("/artworks/discount?discount_percent=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
