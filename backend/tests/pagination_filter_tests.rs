//! List endpoints: pagination headers, exact and LIKE filters.
#![cfg(feature = "http-server")]

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{insert, TestApp};

async fn seed_cities(app: &TestApp, count: usize) {
    for n in 1..=count {
        insert(
            &app.repo,
            "cities",
            json!({"name": format!("City {:02}", n), "country_code": if n % 2 == 0 { "IT" } else { "FR" }}),
        )
        .await;
    }
}

#[tokio::test]
async fn test_default_page_and_headers() {
    let app = TestApp::new().await;
    seed_cities(&app, 30).await;
    let reader = app.token_for(app.reader_id);

    let res = app.get("/api/v3/cities", Some(&reader)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().unwrap().len(), 25);
    assert_eq!(res.header("Total"), Some("30"));
    assert_eq!(res.header("Per-Page"), Some("25"));
    assert_eq!(res.header("Page"), Some("1"));

    let link = res.header("Link").unwrap();
    assert!(link.contains("</api/v3/cities?page=2>; rel=\"next\""));
    assert!(link.contains("</api/v3/cities?page=2>; rel=\"last\""));
    assert!(!link.contains("rel=\"prev\""));
}

#[tokio::test]
async fn test_middle_page_links_keep_filters() {
    let app = TestApp::new().await;
    seed_cities(&app, 30).await;
    let reader = app.token_for(app.reader_id);

    let res = app
        .get("/api/v3/cities?name=city&per_page=5&page=3", Some(&reader))
        .await;
    let rows = res.body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["name"], json!("City 11"));
    assert_eq!(res.header("Page"), Some("3"));

    let link = res.header("Link").unwrap();
    assert!(link.contains("</api/v3/cities?name=city&per_page=5&page=1>; rel=\"first\""));
    assert!(link.contains("</api/v3/cities?name=city&per_page=5&page=2>; rel=\"prev\""));
    assert!(link.contains("</api/v3/cities?name=city&per_page=5&page=4>; rel=\"next\""));
    assert!(link.contains("</api/v3/cities?name=city&per_page=5&page=6>; rel=\"last\""));
}

#[tokio::test]
async fn test_per_page_is_capped() {
    let app = TestApp::new().await;
    seed_cities(&app, 12).await;
    let reader = app.token_for(app.reader_id);

    let res = app
        .get("/api/v3/cities?per_page=50&max_per_page=4", Some(&reader))
        .await;
    assert_eq!(res.header("Per-Page"), Some("4"));
    assert_eq!(res.body.as_array().unwrap().len(), 4);

    let res = app.get("/api/v3/cities?per_page=1000", Some(&reader)).await;
    assert_eq!(res.header("Per-Page"), Some("100"));
    assert!(res.header("Link").is_none());
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new().await;
    seed_cities(&app, 3).await;
    let reader = app.token_for(app.reader_id);

    let res = app.get("/api/v3/cities?page=9", Some(&reader)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
    assert_eq!(res.header("Total"), Some("3"));
}

#[tokio::test]
async fn test_invalid_pagination_is_400() {
    let app = TestApp::new().await;
    let reader = app.token_for(app.reader_id);

    for query in ["page=0", "per_page=-3", "page=abc"] {
        let res = app
            .get(&format!("/api/v3/cities?{}", query), Some(&reader))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "query {}", query);
    }
}

#[tokio::test]
async fn test_exact_and_like_filters_combine() {
    let app = TestApp::new().await;
    seed_cities(&app, 10).await;
    let reader = app.token_for(app.reader_id);

    let res = app.get("/api/v3/cities?country_code=IT", Some(&reader)).await;
    assert_eq!(res.header("Total"), Some("5"));

    // `country_code` is exact: a partial value matches nothing.
    let res = app.get("/api/v3/cities?country_code=I", Some(&reader)).await;
    assert_eq!(res.header("Total"), Some("0"));

    let res = app
        .get("/api/v3/cities?country_code=FR&name=ty%200", Some(&reader))
        .await;
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect();
    assert_eq!(names, vec!["City 01", "City 03", "City 05", "City 07", "City 09"]);
}

#[tokio::test]
async fn test_integer_filters_are_coerced() {
    let app = TestApp::new().await;
    let reader = app.token_for(app.reader_id);
    for (last, year) in [("Rossi", 1970), ("Verdi", 1980), ("Neri", 1970)] {
        insert(
            &app.repo,
            "swimmers",
            json!({"last_name": last, "first_name": "A", "year_of_birth": year, "gender_type_id": 1}),
        )
        .await;
    }

    let res = app.get("/api/v3/swimmers?year_of_birth=1970", Some(&reader)).await;
    assert_eq!(res.header("Total"), Some("2"));

    let res = app.get("/api/v3/swimmers?year_of_birth=old", Some(&reader)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
