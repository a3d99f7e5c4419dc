use std::any::Any;

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::{catalog::CatalogService, observability};

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub mod products;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: CatalogService,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> Result<String, JsonApiError> {
    observability::render().map_err(|e| JsonApiError::internal(e.to_string()))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Count catalog requests by method and final status.
async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let res = next.run(req).await;
    observability::record_request(method.as_str(), res.status().as_u16());
    res
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    JsonApiError::internal(detail).into_response()
}

/// Catch panics inside `router` and count every response, panic 500s included.
/// The counter sits outside the catch-panic layer so it sees the rendered 500.
pub fn with_request_tracking<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(CatchPanicLayer::custom(panic_response))
        .route_layer(middleware::from_fn(track_requests))
}

/// Any origin; catalog methods; `Content-Type` header.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router: catalog resource plus health, metrics and OpenAPI.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Catalog resource: one path, dispatch by method
    let catalog = with_request_tracking(Router::new().route(
        "/api/products",
        get(products::list)
            .post(products::create)
            .put(products::update)
            .delete(products::delete)
            .fallback(products::method_not_allowed),
    ));

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/openapi.json", get(openapi_json));

    ops.merge(catalog)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request as HttpRequest;
    use models::ids::TimestampIdGenerator;
    use service::blob::MemoryBlobStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Arc<MemoryBlobStore>, Router) {
        let blobs = Arc::new(MemoryBlobStore::new());
        let catalog = CatalogService::new(blobs.clone(), "products.json", Arc::new(TimestampIdGenerator::new()));
        (blobs, build_router(ServerState { catalog }, build_cors()))
    }

    fn json_request(method: Method, body: serde_json::Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method(method)
            .uri("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_on_empty_store_is_empty_array() {
        let (_, app) = app();
        let res = app
            .oneshot(HttpRequest::builder().uri("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn post_returns_created() {
        let (blobs, app) = app();
        let res = app
            .oneshot(json_request(Method::POST, serde_json::json!({"name": "Tea", "price": 4, "category": "pantry"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body_json(res).await;
        assert!(!body["id"].as_str().unwrap().is_empty());
        assert_eq!(body["images"], serde_json::json!([]));
        assert_eq!(blobs.put_count(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let (blobs, app) = app();
        let req = HttpRequest::builder()
            .method(Method::POST)
            .uri("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "Validation Error");
        assert_eq!(blobs.put_count(), 0);
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        let (_, app) = app();
        let res = app.oneshot(json_request(Method::PATCH, serde_json::json!({}))).await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(res).await["error"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn options_is_200_empty_with_cors_headers() {
        let (_, app) = app();
        let req = HttpRequest::builder()
            .method(Method::OPTIONS)
            .uri("/api/products")
            .header(header::ORIGIN, "https://shop.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap().to_string();
        assert!(methods.contains("PUT") && methods.contains("DELETE"));
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_500_with_message() {
        let (blobs, app) = app();
        blobs.set_fail_writes(true);
        let res = app
            .oneshot(json_request(Method::DELETE, serde_json::json!({"id": "1"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert!(body["message"].as_str().unwrap().contains("simulated write failure"));
    }

    #[tokio::test]
    async fn panicking_handler_is_counted_as_500() {
        async fn boom() -> &'static str {
            panic!("handler exploded")
        }
        let app: Router = with_request_tracking(Router::new().route("/boom", axum::routing::patch(boom)));
        let counter = observability::REQUESTS_TOTAL.with_label_values(&["PATCH", "500"]);
        let before = counter.get();

        let req = HttpRequest::builder().method(Method::PATCH).uri("/boom").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(res).await["message"].as_str().unwrap().contains("handler exploded"));
        assert!(counter.get() > before);
    }

    #[test]
    fn panic_payloads_become_internal_errors() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let res = panic_response(Box::new(String::from("kaboom")));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
