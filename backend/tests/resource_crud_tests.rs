//! Generic resource endpoints: create, show, update, delete and grants.
#![cfg(feature = "http-server")]

mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};
use support::{insert, TestApp};

async fn create_city(app: &TestApp, token: &str, name: &str) -> i64 {
    let res = app
        .post(
            "/api/v3/city",
            Some(token),
            json!({"name": name, "country_code": "IT", "country": "Italy"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    res.body["new"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_answers_created_with_new_row() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);

    let res = app
        .post(
            "/api/v3/city",
            Some(&editor),
            json!({"name": "Reggio Emilia", "country_code": "IT", "ignored": "x"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["msg"], json!("OK"));
    assert_eq!(res.body["new"]["name"], json!("Reggio Emilia"));
    assert!(res.body["new"].get("ignored").is_none());
    assert!(res.body["new"]["id"].is_i64());
}

#[tokio::test]
async fn test_create_without_grant_is_unauthorized() {
    let app = TestApp::new().await;
    let reader = app.token_for(app.reader_id);

    let res = app
        .post("/api/v3/city", Some(&reader), json!({"name": "Parma", "country_code": "IT"}))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_detail(), Some("insufficient grants"));
    assert_eq!(app.repo.row_count("cities"), 0);
}

#[tokio::test]
async fn test_create_validation_failure_is_422() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);

    let res = app
        .post("/api/v3/city", Some(&editor), json!({"country": "Italy"}))
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail: Value = serde_json::from_str(res.error_detail().unwrap()).unwrap();
    assert_eq!(detail["name"], json!(["can't be blank"]));
    assert_eq!(detail["country_code"], json!(["can't be blank"]));
    assert_eq!(res.body["details"], detail);
}

#[tokio::test]
async fn test_create_with_mistyped_param_is_400() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);

    let res = app
        .post(
            "/api/v3/swimmer",
            Some(&editor),
            json!({"last_name": "Rossi", "first_name": "Mario", "year_of_birth": "old", "gender_type_id": 1}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error_detail().unwrap().contains("year_of_birth"));
}

#[tokio::test]
async fn test_create_checks_references() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);

    let res = app
        .post(
            "/api/v3/swimmer",
            Some(&editor),
            json!({"last_name": "Rossi", "first_name": "Mario", "year_of_birth": 1970, "gender_type_id": 9}),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        res.body["details"]["gender_type_id"],
        json!(["is not included in the list"])
    );
}

#[tokio::test]
async fn test_show_expands_associations() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);
    let reader = app.token_for(app.reader_id);
    let season_id = insert(
        &app.repo,
        "seasons",
        json!({"description": "2023/2024", "season_type_id": 1}),
    )
    .await;

    let res = app
        .post(
            "/api/v3/meeting",
            Some(&editor),
            json!({"description": "Trofeo Città di Reggio", "season_id": season_id, "timing_type_id": 3}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    let id = res.body["new"]["id"].as_i64().unwrap();

    let res = app.get(&format!("/api/v3/meeting/{}", id), Some(&reader)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["description"], json!("Trofeo Città di Reggio"));
    assert_eq!(res.body["season"]["description"], json!("2023/2024"));
    assert_eq!(res.body["timing_type"]["code"], json!("A"));
}

#[tokio::test]
async fn test_show_missing_row_is_404() {
    let app = TestApp::new().await;
    let reader = app.token_for(app.reader_id);
    let res = app.get("/api/v3/city/999", Some(&reader)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_update_answers_boolean() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);
    let reader = app.token_for(app.reader_id);
    let id = create_city(&app, &editor, "Modena").await;

    let res = app
        .put(&format!("/api/v3/city/{}", id), Some(&editor), json!({"area": "MO"}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!(true));

    let shown = app.get(&format!("/api/v3/city/{}", id), Some(&reader)).await;
    assert_eq!(shown.body["area"], json!("MO"));
    assert_eq!(shown.body["name"], json!("Modena"));

    let res = app
        .put("/api/v3/city/4040", Some(&editor), json!({"area": "MO"}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!(false));
}

#[tokio::test]
async fn test_update_cannot_blank_required_field() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);
    let id = create_city(&app, &editor, "Carpi").await;

    let res = app
        .put(&format!("/api/v3/city/{}", id), Some(&editor), json!({"name": ""}))
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_answers_boolean() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);
    let id = create_city(&app, &editor, "Sassuolo").await;

    let res = app.delete(&format!("/api/v3/city/{}", id), Some(&editor)).await;
    assert_eq!(res.body, json!(true));
    assert_eq!(app.repo.row_count("cities"), 0);

    let res = app.delete(&format!("/api/v3/city/{}", id), Some(&editor)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!(false));
}

#[tokio::test]
async fn test_swimmer_delete_requires_admin() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);
    let admin = app.token_for(app.admin_id);

    let res = app
        .post(
            "/api/v3/swimmer",
            Some(&editor),
            json!({"last_name": "Bianchi", "first_name": "Anna", "year_of_birth": "1985", "gender_type_id": 2}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["new"]["complete_name"], json!("Bianchi Anna"));
    let id = res.body["new"]["id"].as_i64().unwrap();

    let res = app.delete(&format!("/api/v3/swimmer/{}", id), Some(&editor)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_detail(), Some("insufficient grants"));

    let res = app.delete(&format!("/api/v3/swimmer/{}", id), Some(&admin)).await;
    assert_eq!(res.body, json!(true));
}

#[tokio::test]
async fn test_users_are_admin_only_and_hide_passwords() {
    let app = TestApp::new().await;
    let editor = app.token_for(app.editor_id);
    let admin = app.token_for(app.admin_id);

    let res = app.get("/api/v3/users", Some(&editor)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/api/v3/users", Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK);
    let users = res.body.as_array().unwrap();
    assert_eq!(users.len(), 3);
    for user in users {
        assert!(user.get("encrypted_password").is_none());
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn test_deleting_user_removes_its_grants() {
    let app = TestApp::new().await;
    let admin = app.token_for(app.admin_id);
    assert_eq!(app.repo.row_count("admin_grants"), 4);

    let res = app
        .delete(&format!("/api/v3/user/{}", app.editor_id), Some(&admin))
        .await;
    assert_eq!(res.body, json!(true));
    assert_eq!(app.repo.row_count("admin_grants"), 1);
    assert_eq!(app.repo.row_count("users"), 2);
}

#[tokio::test]
async fn test_reservations_cannot_be_created_generically() {
    let app = TestApp::new().await;
    let admin = app.token_for(app.admin_id);
    let res = app
        .post("/api/v3/meeting_event_reservation", Some(&admin), json!({}))
        .await;
    assert!(matches!(
        res.status,
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
    ));
}

#[tokio::test]
async fn test_show_does_not_expand_admin_only_references() {
    let app = TestApp::new().await;
    let swimmer_id = insert(
        &app.repo,
        "swimmers",
        json!({
            "last_name": "Rossi",
            "first_name": "Mario",
            "year_of_birth": 1970,
            "gender_type_id": 1,
            "associated_user_id": app.admin_id
        }),
    )
    .await;
    let uri = format!("/api/v3/swimmer/{}", swimmer_id);

    let reader = app.token_for(app.reader_id);
    let res = app
        .get(&format!("/api/v3/user/{}", app.admin_id), Some(&reader))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get(&uri, Some(&reader)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["associated_user_id"], json!(app.admin_id));
    assert!(res.body.get("associated_user").is_none());
    assert_eq!(res.body["gender_type"]["code"], json!("M"));

    let admin = app.token_for(app.admin_id);
    let res = app.get(&uri, Some(&admin)).await;
    assert_eq!(res.body["associated_user"]["id"], json!(app.admin_id));
    assert!(res.body["associated_user"].get("encrypted_password").is_none());
}
