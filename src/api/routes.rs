use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::fetcher::{fetch_meme_urls, select_meme};
use crate::templates::TEMPLATE_NAME;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", any(meme_page))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serves the meme page. The upstream fetch runs before method dispatch, so
/// every request costs one hub call; unsupported methods still get a 405
/// afterwards.
async fn meme_page(State(state): State<AppState>, method: Method) -> Response {
    let urls = match fetch_meme_urls(&state.config.hub_url).await {
        Ok(urls) => urls,
        Err(err) => return err.into_response(),
    };

    if method == Method::GET || method == Method::POST {
        let url = match select_meme(&urls, &mut rand::thread_rng()) {
            Ok(url) => url,
            Err(err) => return err.into_response(),
        };
        render_page(&state, &url)
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            Html("<h1>405 Method Not Allowed</h1>"),
        )
            .into_response()
    }
}

fn render_page(state: &AppState, url: &str) -> Response {
    match state
        .templates
        .render(TEMPLATE_NAME, &serde_json::json!({ "url": url }))
    {
        Ok(html) => Html(html).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use crate::config::Config;
    use crate::templates::load_templates;

    const SINGLE_MEME_PAYLOAD: &str = r#"{
        "messages": [
            { "data": { "castAddBody": { "embeds": [
                { "url": "https://i.imgur.com/only.png" },
                { "url": "https://i.imgur.com/clip.mp4" }
            ] } } }
        ],
        "nextPageToken": ""
    }"#;

    /// Spawns a one-route stub hub on an ephemeral port and returns its URL.
    async fn spawn_stub_hub(body: &'static str) -> String {
        let app = Router::new().route(
            "/v1/castsByParent",
            axum::routing::get(move || async move { body }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/castsByParent", addr)
    }

    fn app_for(hub_url: String) -> Router {
        let config = Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            hub_url,
        };
        create_router(AppState {
            config: Arc::new(config),
            templates: Arc::new(load_templates().unwrap()),
        })
    }

    async fn send(app: Router, method: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn get_serves_html_with_the_selected_url() {
        let hub_url = spawn_stub_hub(SINGLE_MEME_PAYLOAD).await;
        let (status, content_type, body) = send(app_for(hub_url), "GET").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("https://i.imgur.com/only.png"));
        assert!(!body.contains("clip.mp4"));
    }

    #[tokio::test]
    async fn get_and_post_produce_identical_bodies() {
        // One qualifying URL, so the random draw cannot differ between calls.
        let hub_url = spawn_stub_hub(SINGLE_MEME_PAYLOAD).await;
        let app = app_for(hub_url);
        let (get_status, _, get_body) = send(app.clone(), "GET").await;
        let (post_status, _, post_body) = send(app, "POST").await;
        assert_eq!(get_status, StatusCode::OK);
        assert_eq!(post_status, StatusCode::OK);
        assert_eq!(get_body, post_body);
    }

    #[tokio::test]
    async fn other_methods_get_the_fixed_405_page() {
        let hub_url = spawn_stub_hub(SINGLE_MEME_PAYLOAD).await;
        let (status, _, body) = send(app_for(hub_url), "DELETE").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "<h1>405 Method Not Allowed</h1>");
    }

    #[tokio::test]
    async fn no_qualifying_embeds_is_a_bad_gateway() {
        let hub_url = spawn_stub_hub(
            r#"{"messages":[{"data":{"castAddBody":{"embeds":[{"url":"https://a.example/clip.mp4"}]}}}]}"#,
        )
        .await;
        let (status, _, _) = send(app_for(hub_url), "GET").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn malformed_hub_json_is_a_bad_gateway() {
        let hub_url = spawn_stub_hub(r#"{"messages": "not-an-array"}"#).await;
        let (status, _, _) = send(app_for(hub_url), "GET").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn unreachable_hub_is_a_bad_gateway() {
        // Bind then drop a listener so the port is closed when the fetch runs.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let (status, _, _) = send(app_for(format!("http://{}/", addr)), "GET").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
