//! # Employee Records API
//!
//! REST API service for managing employee records.
//!
//! ## Endpoints
//!
//! - `GET /api/employee?page=&perPage=` - paginated list of active employees
//! - `GET /api/employee/{id}` - single employee
//! - `POST /api/employee` - create an employee
//! - `PUT /api/employee/{id}` - update name and date of birth
//! - `GET /health` - liveness
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │            (CORS, tracing, request timeout)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ApiContext                               │
//! │                 (EmployeeAccessor)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Redis Cache         │   │        PostgreSQL            │
//! │  (emp:<id>, 60s TTL)    │   │   (Source of Truth)          │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use context::ApiContext;
pub use error::{ApiError, ApiResult};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Build the Axum router
pub fn build_router(ctx: ApiContext, config: &Config) -> Router {
    Router::new()
        .route(
            "/api/employee",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/api/employee/{id}",
            get(handlers::get_employee).put(handlers::update_employee),
        )
        .route("/health", get(health_check))
        .with_state(ctx)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        build_router(ApiContext::in_memory(config.cache), &config)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn create(app: &Router, name: &str) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/employee",
            Some(json!({"name": name, "dob": "1990-01-01 00:00 +0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_get_update_flow() {
        let app = app();

        let created = create(&app, "  Alice ").await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["name"], "Alice");
        assert_eq!(created["dob"], "1990-01-01T00:00:00Z");

        let (status, fetched) = send(&app, "GET", "/api/employee/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(
            &app,
            "PUT",
            "/api/employee/1",
            Some(json!({"name": "Alicia", "dob": "1990-01-01 00:00 +0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], 1);
        assert_eq!(updated["name"], "Alicia");

        let (_, fetched) = send(&app, "GET", "/api/employee/1", None).await;
        assert_eq!(fetched["name"], "Alicia");
    }

    #[tokio::test]
    async fn test_create_validation_failures() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/employee",
            Some(json!({"name": "Young", "dob": "2020-01-01 00:00 +0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");

        let (status, _) = send(
            &app,
            "POST",
            "/api/employee",
            Some(json!({"name": "   ", "dob": "1990-01-01 00:00 +0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "POST",
            "/api/employee",
            Some(json!({"name": "Bad", "dob": "1990/01/01"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_malformed_body() {
        let request = Request::post("/api/employee")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/employee/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", "/api/employee/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_unknown_employee() {
        let (status, body) = send(
            &app(),
            "PUT",
            "/api/employee/9",
            Some(json!({"name": "Nobody", "dob": "1990-01-01 00:00 +0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "employee with the given id not found");
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let app = app();
        for name in ["A", "B", "C"] {
            create(&app, name).await;
        }

        let (status, body) = send(&app, "GET", "/api/employee", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 3);
        let names: Vec<&str> = body["employees"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let (_, body) = send(&app, "GET", "/api/employee?perPage=2&page=2", None).await;
        assert_eq!(body["employees"].as_array().unwrap().len(), 1);
        assert_eq!(body["employees"][0]["name"], "C");

        let (_, body) = send(&app, "GET", "/api/employee?perPage=0", None).await;
        assert_eq!(body["employees"], json!([]));
        assert_eq!(body["totalCount"], 3);

        let (_, body) = send(&app, "GET", "/api/employee?page=9", None).await;
        assert_eq!(body["employees"], json!([]));
    }

    #[tokio::test]
    async fn test_list_rejects_non_numeric_paging() {
        let (status, body) = send(&app(), "GET", "/api/employee?perPage=lots", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }
}
