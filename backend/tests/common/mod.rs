//! Common test utilities for integration tests
//!
//! This module provides shared setup for integration tests. Every app gets a
//! fresh in-memory store and a UTC day calendar.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use macro_tracker_backend::{
    config::{AppConfig, CalendarConfig, FoodLookupConfig},
    repositories::{InMemoryStore, NutritionStore},
    routes,
    services::OpenFoodFactsClient,
    state::AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Create a test application whose food lookups go to `lookup_url`
    pub fn with_lookup(lookup_url: &str) -> Self {
        let config = test_config(lookup_url);
        let store = Arc::new(InMemoryStore::new());
        let lookup = OpenFoodFactsClient::new(&config.food_lookup).expect("Failed to build client");

        let state = AppState::new(store.clone(), Arc::new(lookup), config);
        let app = routes::create_router(state);

        Self { app, store }
    }

    /// Create a test application with an unreachable food database
    pub fn new() -> Self {
        Self::with_lookup("http://127.0.0.1:9")
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a request with a JSON body
    pub async fn json(&self, method: &str, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.json("POST", path, body).await
    }

    /// Make a PUT request with JSON body
    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.json("PUT", path, body).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.json("PATCH", path, body).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Set up the reference profile (30 y, 70 kg, 175 cm, male, moderate, maintain)
    pub async fn create_profile(&self) {
        let body = serde_json::json!({
            "age": "30",
            "weight": "70",
            "height": "175",
            "gender": "male",
            "activity_level": "moderately_active",
            "goal": "maintain"
        });
        let (status, _) = self.put("/api/v1/profile", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
    }

    pub async fn entry_count(&self) -> usize {
        self.store.list_entries().await.unwrap().len()
    }
}

pub fn test_config(lookup_url: &str) -> AppConfig {
    AppConfig {
        food_lookup: FoodLookupConfig {
            base_url: lookup_url.to_string(),
            timeout_secs: 2,
            ..Default::default()
        },
        calendar: CalendarConfig {
            utc_offset_minutes: Some(0),
        },
        ..Default::default()
    }
}

pub fn parse(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}
