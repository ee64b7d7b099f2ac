use crate::{
    error::StoreError,
    models::{
        ApiResponse, CodeStatsResponse, LookupResponse, Record, ShortenRequest, ShortenResponse,
        Stats,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

// ── Documented endpoints ───────────────────────────────────────────────────

/// POST /api/shorturl
///
/// A body without a string `url` is answered like any other invalid URL.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, StoreError> {
    let Json(req) = body.map_err(|rejection| StoreError::InvalidUrl {
        url: String::new(),
        reason: rejection.body_text(),
    })?;

    let record = state.store.shorten(&req.url).await?;
    Ok(Json(record.into()))
}

/// GET /api/shorturl/:code
///
/// Counts as a click.
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<LookupResponse>, StoreError> {
    let record = state.store.lookup(&code).await?;
    Ok(Json(record.into()))
}

/// GET /api/shorturl/stats/:code
pub async fn code_stats(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CodeStatsResponse>, StoreError> {
    let record = state.store.peek(&code).await?;
    Ok(Json(record.into()))
}

// ── Collection endpoints ───────────────────────────────────────────────────

/// GET /api/urls
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Record>>>, StoreError> {
    let records = state.store.list().await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// GET /api/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Stats>>, StoreError> {
    let stats = state.store.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// DELETE /api/urls/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, StoreError> {
    if state.store.delete(&id).await? {
        Ok(Json(ApiResponse::ok(id)).into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::failure("URL not found")),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use crate::{app, memory::MemoryStorage, store::RecordStore, AppState};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> (Router, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = RecordStore::new(
            Arc::new(storage.clone()),
            "urlShortener_urls",
            "https://sho.rt",
        );
        (app(Arc::new(AppState { store })), storage)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_url(url: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/shorturl")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "url": url }).to_string()))
            .unwrap()
    }

    fn code_of(short_url: &Value) -> String {
        short_url
            .as_str()
            .unwrap()
            .rsplit('/')
            .next()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn shorten_returns_documented_shape() {
        let (app, _) = test_app();
        let (status, body) = send(&app, post_url("https://www.example.com")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original_url"], "https://www.example.com");
        let short_url = body["short_url"].as_str().unwrap();
        assert!(short_url.starts_with("https://sho.rt/"));
        assert_eq!(code_of(&body["short_url"]).len(), 6);
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn shorten_same_url_twice_gives_same_short_url() {
        let (app, _) = test_app();
        let (_, first) = send(&app, post_url("https://www.example.com")).await;
        let (_, second) = send(&app, post_url("https://www.example.com")).await;
        assert_eq!(first["short_url"], second["short_url"]);
    }

    #[tokio::test]
    async fn shorten_invalid_url_is_bad_request() {
        let (app, storage) = test_app();
        let (status, body) = send(&app, post_url("ftp://example.com")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "error": "Invalid URL format" }));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn malformed_shorten_bodies_get_the_failure_envelope() {
        let (app, storage) = test_app();
        for body in [r#"{}"#, r#"{"url":123}"#, r#"{"url":null}"#, "not json"] {
            let req = Request::builder()
                .method("POST")
                .uri("/api/shorturl")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap();
            let (status, resp) = send(&app, req).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(
                resp,
                json!({ "success": false, "error": "Invalid URL format" }),
                "body {body:?}"
            );
        }
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn lookup_increments_and_stats_endpoint_does_not() {
        let (app, _) = test_app();
        let (_, created) = send(&app, post_url("https://www.example.com")).await;
        let code = code_of(&created["short_url"]);

        let (status, body) = send(&app, get(&format!("/api/shorturl/{code}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "original_url": "https://www.example.com",
                "short_url": format!("https://sho.rt/{code}"),
                "click_count": 1,
            })
        );

        let (_, body) = send(&app, get(&format!("/api/shorturl/{code}"))).await;
        assert_eq!(body["click_count"], 2);

        let (status, body) = send(&app, get(&format!("/api/shorturl/stats/{code}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["click_count"], 2);
        assert_eq!(body["short_code"], code);
        assert!(body["created_at"].is_string());

        let (_, body) = send(&app, get(&format!("/api/shorturl/stats/{code}"))).await;
        assert_eq!(body["click_count"], 2);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (app, _) = test_app();
        let (status, body) = send(&app, get("/api/shorturl/abc123")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Short URL not found");

        let (status, _) = send(&app, get("/api/shorturl/stats/abc123")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_and_stats_reflect_the_collection() {
        let (app, _) = test_app();
        send(&app, post_url("https://a.example.com")).await;
        let (_, b) = send(&app, post_url("https://b.example.com")).await;
        send(&app, get(&format!("/api/shorturl/{}", code_of(&b["short_url"])))).await;

        let (status, body) = send(&app, get("/api/urls")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let urls = body["data"].as_array().unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0]["originalUrl"], "https://b.example.com");
        assert_eq!(urls[0]["clickCount"], 1);

        let (_, body) = send(&app, get("/api/stats")).await;
        assert_eq!(body["data"]["totalUrls"], 2);
        assert_eq!(body["data"]["totalClicks"], 1);
        assert_eq!(body["data"]["averageClicks"], 1);
        assert_eq!(body["data"]["recentRecords"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_by_id() {
        let (app, _) = test_app();
        send(&app, post_url("https://a.example.com")).await;
        let (_, list) = send(&app, get("/api/urls")).await;
        let id = list["data"][0]["id"].as_str().unwrap().to_owned();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/urls/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": id }));

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/urls/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (_, list) = send(&app, get("/api/urls")).await;
        assert!(list["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_storage_is_a_server_error() {
        let (app, storage) = test_app();
        {
            use crate::storage::BlobStorage;
            storage.save("urlShortener_urls", "oops").await.unwrap();
        }

        let (status, body) = send(&app, get("/api/urls")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "error": "Storage error" }));
    }
}
