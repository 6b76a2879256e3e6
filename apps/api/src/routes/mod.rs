pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::card_names::handlers as card_name_handlers;
use crate::collage::handlers as collage_handlers;
use crate::mirror::handlers as mirror_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Collage API
        .route(
            "/api/v1/collage/layout",
            post(collage_handlers::handle_collage_layout),
        )
        .route("/api/v1/collage", post(collage_handlers::handle_collage))
        // Card names
        .route(
            "/api/v1/cards/:id/name",
            get(card_name_handlers::handle_card_name),
        )
        .route(
            "/api/v1/card-names/reload",
            post(card_name_handlers::handle_reload_card_names),
        )
        // Comment mirroring
        .route(
            "/api/v1/mirror/comments",
            post(mirror_handlers::handle_mirror_comment),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use httpmock::prelude::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use serde_json::{json, Value};
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    use crate::card_names::{CardNameCache, JsonFileSource};
    use crate::collage::fetch::ImageFetcher;
    use crate::i18n::bundled_translations;
    use crate::layout::default_canvas_config;

    const BODY_LIMIT: usize = 8 * 1024 * 1024;

    fn test_state(image_base_url: &str, names_file: &NamedTempFile) -> AppState {
        let source = Arc::new(JsonFileSource::new(names_file.path()));

        AppState {
            canvas: default_canvas_config(),
            translations: Arc::new(bundled_translations().unwrap()),
            card_names: Arc::new(CardNameCache::new(source, chrono::Duration::hours(1))),
            fetcher: ImageFetcher::new(image_base_url, Duration::from_secs(2)).unwrap(),
            background: None,
            mirror: None,
        }
    }

    fn names_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"A1-094": {{"ja": "ピカチュウ", "en": "Pikachu"}}, "P-A-001": "Potion"}}"#
        )
        .unwrap();
        file
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_layout_endpoint_returns_plan_and_titles() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(json_request(
                "/api/v1/collage/layout",
                json!({"offered_count": 5, "wanted_count": 20, "lang": "en"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["plan"]["group1"].as_array().unwrap().len(), 5);
        assert_eq!(body["plan"]["group2"].as_array().unwrap().len(), 20);
        assert_eq!(body["titles"]["offered"], "Offering");
        assert!(body["plan"]["zones"]["optimal_card_size"].as_u64().unwrap() < 200);
    }

    #[tokio::test]
    async fn test_layout_endpoint_rejects_oversized_groups() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(json_request(
                "/api/v1/collage/layout",
                json!({"offered_count": 101, "wanted_count": 0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_collage_requires_a_card() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(json_request(
                "/api/v1/collage",
                json!({"offered": [], "wanted": []}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_collage_renders_png_with_missing_images() {
        let server = MockServer::start_async().await;
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 42, Rgba([255, 0, 0, 255])))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        let png = png.into_inner();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/A1-094.png");
                then.status(200)
                    .header("content-type", "image/png")
                    .body(png.clone());
            })
            .await;

        let names = names_file();
        let app = build_router(test_state(&server.base_url(), &names));

        let response = app
            .oneshot(json_request(
                "/api/v1/collage",
                json!({"offered": ["A1-094"], "wanted": ["A1-404"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        let rendered = image::load_from_memory(&bytes).unwrap();
        assert_eq!((rendered.width(), rendered.height()), (1200, 630));
    }

    #[tokio::test]
    async fn test_card_name_lookup() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/cards/A1-094/name?lang=en")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Pikachu");
        assert_eq!(body["lang"], "en");

        let response = app
            .oneshot(
                Request::get("/api/v1/cards/missing/name")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_card_name_rejects_unknown_language() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(
                Request::get("/api/v1/cards/A1-094/name?lang=xx")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_reports_card_count() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(
                Request::post("/api/v1/card-names/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["cards"], 2);
    }

    #[tokio::test]
    async fn test_mirror_disabled_without_configuration() {
        let names = names_file();
        let app = build_router(test_state("http://127.0.0.1:9", &names));

        let response = app
            .oneshot(json_request(
                "/api/v1/mirror/comments",
                json!({"thread_id": "42", "body": "nice"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
