// tests/categories_tests.rs
#[macro_use]
mod common;
use common::*;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

async fn fetch(uri: &str) -> (StatusCode, Value, Fixture) {
  let fixture = seeded();
  let app = test_app!(fixture.state.clone());
  let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
  let status = resp.status();
  let body: Value = test::read_body_json(resp).await;
  (status, body, fixture)
}

fn names(body: &Value) -> Vec<String> {
  body["categories"]
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["name"].as_str().unwrap().to_string())
    .collect()
}

#[actix_web::test]
async fn active_only_returns_active_rows_by_sort_order() {
  let (status, body, _) = fetch("/api/categories?activeOnly=true").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), vec!["Accessories", "Apparel", "Empty"]);
  assert!(body["categories"]
    .as_array()
    .unwrap()
    .iter()
    .all(|c| c["is_active"] == Value::Bool(true)));
}

#[actix_web::test]
async fn without_flags_all_rows_are_returned_in_sort_order() {
  let (status, body, _) = fetch("/api/categories").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), vec!["Archive", "Accessories", "Apparel", "Empty"]);
  assert!(body["categories"][0].get("product_count").is_none());
}

#[actix_web::test]
async fn flags_need_the_literal_string_true() {
  let (_, body, _) = fetch("/api/categories?activeOnly=1&includeProducts=yes").await;
  assert_eq!(names(&body).len(), 4);
  assert!(body["categories"][0].get("product_count").is_none());
}

#[actix_web::test]
async fn include_products_counts_only_active_products() {
  let (status, body, fixture) = fetch("/api/categories?includeProducts=true&activeOnly=true").await;
  assert_eq!(status, StatusCode::OK);

  let categories = body["categories"].as_array().unwrap();
  let count_for = |id: uuid::Uuid| {
    categories
      .iter()
      .find(|c| c["id"] == Value::String(id.to_string()))
      .map(|c| c["product_count"].as_i64().unwrap())
      .unwrap()
  };
  // The inactive "Retired cap" is not counted.
  assert_eq!(count_for(fixture.apparel.id), 2);
  assert_eq!(count_for(fixture.accessories.id), 1);
  assert_eq!(categories.last().unwrap()["name"], "Empty");
  assert_eq!(categories.last().unwrap()["product_count"], 0);
}

#[actix_web::test]
async fn unsupported_method_is_a_json_405() {
  let fixture = seeded();
  let app = test_app!(fixture.state.clone());
  let resp = test::call_service(&app, test::TestRequest::post().uri("/api/categories").to_request()).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Method not allowed");
}
