use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use shelf_core::{author::Author, book::Book, store::LibraryStore as _};
use shelf_store_sqlite::SqliteStore;
use tower::ServiceExt as _;
use uuid::Uuid;

use super::*;

async fn make_store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.unwrap())
}

fn app(store: &Arc<SqliteStore>) -> Router {
  api_router(store.clone(), &ApiConfig::default()).unwrap()
}

async fn seed_author(store: &SqliteStore) -> Author {
  let author = Author {
    id:            Uuid::new_v4(),
    first_name:    "Douglas".to_string(),
    last_name:     "Adams".to_string(),
    date_of_birth: NaiveDate::from_ymd_opt(1952, 3, 11).unwrap(),
    genre:         Some("Science fiction".to_string()),
  };
  store.save_author(author.clone()).await.unwrap();
  author
}

async fn send(
  store:   &Arc<SqliteStore>,
  method:  &str,
  uri:     &str,
  headers: Vec<(header::HeaderName, &str)>,
  body:    &str,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  app(store).oneshot(req).await.unwrap()
}

async fn send_json(store: &Arc<SqliteStore>, method: &str, uri: &str, body: Value) -> Response {
  send(
    store,
    method,
    uri,
    vec![(header::CONTENT_TYPE, "application/json")],
    &body.to_string(),
  )
  .await
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

// ── Version selection ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_defaults_to_full_records() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send(&store, "GET", "/authors", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body[0]["id"], author.id.to_string());
  assert_eq!(body[0]["firstName"], "Douglas");
  assert_eq!(body[0]["dateOfBirth"], "1952-03-11");
}

#[tokio::test]
async fn list_v2_returns_summaries() {
  let store = make_store().await;
  seed_author(&store).await;

  let resp = send(&store, "GET", "/authors?api-version=2.0", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body[0]["name"], "Douglas Adams");
  assert!(body[0].get("firstName").is_none(), "summary leaked fields: {body}");

  let via_header = send(
    &store,
    "GET",
    "/authors",
    vec![(header::HeaderName::from_static("api-version"), "2.0")],
    "",
  )
  .await;
  assert_eq!(json_body(via_header).await, body);
}

#[tokio::test]
async fn unknown_version_is_rejected_unless_operation_is_neutral() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send(&store, "GET", "/authors?api-version=3.0", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let uri = format!("/authors/{}/books?api-version=3.0", author.id);
  let resp = send(&store, "GET", &uri, vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn garbled_version_is_400() {
  let store = make_store().await;
  let resp = send(&store, "GET", "/authors?api-version=latest", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_version_registration_fails_router_build() {
  let store = make_store().await;
  let registrations = vec![
    registration(
      "GetAuthors", Verb::Get, "/authors", "",
      &[V1_0], get(authors::list::<SqliteStore>),
    ),
    registration(
      "GetAuthorsAgain", Verb::Get, "/authors", "",
      &[V1_0, V2_0], get(authors::list_summaries::<SqliteStore>),
    ),
  ];

  let err = build_router(store, &ApiConfig::default(), registrations)
    .err()
    .expect("ambiguous registration");
  assert_eq!(err.operation, "GET /authors");
  assert_eq!(err.version, "version 1.0");
}

#[tokio::test]
async fn distinct_versions_on_one_slot_build() {
  let store = make_store().await;
  let registrations = vec![
    registration(
      "GetAuthors", Verb::Get, "/authors", "",
      &[V1_0], get(authors::list::<SqliteStore>),
    ),
    registration(
      "GetAuthorsV2", Verb::Get, "/authors", "",
      &[V2_0], get(authors::list_summaries::<SqliteStore>),
    ),
  ];
  assert!(build_router(store, &ApiConfig::default(), registrations).is_ok());
}

// ── Authors ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_author_by_id() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send(&store, "GET", &format!("/authors/{}", author.id), vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["id"], author.id.to_string());
  assert_eq!(body["lastName"], "Adams");
}

#[tokio::test]
async fn get_missing_author_is_404() {
  let store = make_store().await;
  let resp = send(&store, "GET", &format!("/authors/{}", Uuid::new_v4()), vec![], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_author_id_is_malformed() {
  let store = make_store().await;
  let resp = send(&store, "GET", "/authors/not-a-uuid", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json_body(resp).await;
  assert_eq!(body["error"], "malformed request");
  assert!(body["details"]["authorId"].is_array());
}

#[tokio::test]
async fn create_author_returns_201_and_persists() {
  let store = make_store().await;
  let resp = send_json(
    &store,
    "POST",
    "/authors",
    json!({
      "firstName":   "Stephen",
      "lastName":    "Fry",
      "dateOfBirth": "1957-08-24",
    }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let body = json_body(resp).await;
  let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
  let stored = store.get_author(id).await.unwrap().unwrap();
  assert_eq!(stored.last_name, "Fry");
  assert_eq!(stored.genre, None);
}

#[tokio::test]
async fn create_author_without_birth_date_is_422() {
  let store = make_store().await;
  let resp = send_json(
    &store,
    "POST",
    "/authors",
    json!({ "firstName": "Stephen", "lastName": "Fry" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body = json_body(resp).await;
  assert!(body["errors"]["dateOfBirth"].is_array(), "{body}");
}

#[tokio::test]
async fn put_replaces_mutable_fields() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PUT",
    &format!("/authors/{}", author.id),
    json!({ "firstName": "Doug", "lastName": "Adams" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let stored = store.get_author(author.id).await.unwrap().unwrap();
  assert_eq!(stored.first_name, "Doug");
  assert_eq!(stored.genre, None);
  assert_eq!(stored.date_of_birth, author.date_of_birth);
}

#[tokio::test]
async fn put_missing_required_field_is_422() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PUT",
    &format!("/authors/{}", author.id),
    json!({ "firstName": "Doug" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body = json_body(resp).await;
  assert_eq!(body["status"], 422);
  assert!(body["errors"]["lastName"].is_array(), "{body}");

  let stored = store.get_author(author.id).await.unwrap().unwrap();
  assert_eq!(stored, author);
}

#[tokio::test]
async fn put_wrong_field_type_is_422() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PUT",
    &format!("/authors/{}", author.id),
    json!({ "firstName": 42, "lastName": "Adams" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn put_unparseable_body_is_400() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send(
    &store,
    "PUT",
    &format!("/authors/{}", author.id),
    vec![(header::CONTENT_TYPE, "application/json")],
    "{ not json",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "malformed request");
}

#[tokio::test]
async fn put_unknown_author_is_404() {
  let store = make_store().await;
  let resp = send_json(
    &store,
    "PUT",
    &format!("/authors/{}", Uuid::new_v4()),
    json!({ "firstName": "Doug", "lastName": "Adams" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── PATCH ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_applies_operations_in_order() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PATCH",
    &format!("/authors/{}", author.id),
    json!([
      { "op": "test",    "path": "/firstName", "value": "Douglas" },
      { "op": "replace", "path": "/firstName", "value": "Doug" },
      { "op": "remove",  "path": "/genre" },
    ]),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["firstName"], "Doug");
  assert_eq!(body["genre"], Value::Null);

  let stored = store.get_author(author.id).await.unwrap().unwrap();
  assert_eq!(stored.first_name, "Doug");
  assert_eq!(stored.genre, None);
}

#[tokio::test]
async fn patch_failed_test_is_400_and_nothing_changes() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PATCH",
    &format!("/authors/{}", author.id),
    json!([
      { "op": "replace", "path": "/firstName", "value": "Doug" },
      { "op": "test",    "path": "/lastName",  "value": "Fry" },
    ]),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json_body(resp).await;
  assert_eq!(body["reason"], "test_mismatch");
  assert_eq!(body["path"], "/lastName");

  let stored = store.get_author(author.id).await.unwrap().unwrap();
  assert_eq!(stored, author);
}

#[tokio::test]
async fn patch_removing_required_field_is_400() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PATCH",
    &format!("/authors/{}", author.id),
    json!([{ "op": "remove", "path": "/lastName" }]),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["reason"], "illegal_removal");
}

#[tokio::test]
async fn patch_leaving_invalid_author_is_422() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PATCH",
    &format!("/authors/{}", author.id),
    json!([{ "op": "replace", "path": "/lastName", "value": null }]),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert!(json_body(resp).await["errors"]["lastName"].is_array());

  let stored = store.get_author(author.id).await.unwrap().unwrap();
  assert_eq!(stored, author);
}

#[tokio::test]
async fn patch_body_that_is_not_a_document_is_400() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "PATCH",
    &format!("/authors/{}", author.id),
    json!({ "firstName": "Doug" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "malformed request");
}

// ── Books ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_book() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "POST",
    &format!("/authors/{}/books?api-version=2.0", author.id),
    json!({ "title": "Mostly Harmless" }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["authorId"], author.id.to_string());

  let uri = format!("/authors/{}/books/{}", author.id, created["id"].as_str().unwrap());
  let resp = send(&store, "GET", &uri, vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, created);
}

#[tokio::test]
async fn book_of_another_author_is_404() {
  let store = make_store().await;
  let author = seed_author(&store).await;
  let book = Book {
    id:          Uuid::new_v4(),
    author_id:   author.id,
    title:       "The Salmon of Doubt".to_string(),
    description: None,
  };
  store.save_book(book.clone()).await.unwrap();

  let uri = format!("/authors/{}/books/{}", Uuid::new_v4(), book.id);
  let resp = send(&store, "GET", &uri, vec![], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_book_with_blank_title_is_422() {
  let store = make_store().await;
  let author = seed_author(&store).await;

  let resp = send_json(
    &store,
    "POST",
    &format!("/authors/{}/books", author.id),
    json!({ "title": "  " }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn documents_partition_operations_by_version() {
  let store = make_store().await;

  let v1 = json_body(send(&store, "GET", "/docs/1.0", vec![], "").await).await;
  let v2 = json_body(send(&store, "GET", "/docs/2.0", vec![], "").await).await;

  assert_eq!(v1["info"]["version"], "1.0");
  assert_eq!(v1["paths"]["/authors"]["get"]["operationId"], "GetAuthors");
  assert_eq!(v2["paths"]["/authors"]["get"]["operationId"], "GetAuthorsV2");

  for doc in [&v1, &v2] {
    assert_eq!(doc["paths"]["/authors/{author_id}"]["patch"]["operationId"], "PartiallyUpdateAuthor");
    assert_eq!(doc["paths"]["/authors/{author_id}/books"]["post"]["operationId"], "CreateBook");
  }
}

#[tokio::test]
async fn unknown_document_is_404() {
  let store = make_store().await;
  let resp = send(&store, "GET", "/docs/9.0", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
