use axum::{
    response::{Html, IntoResponse, Response},
    http::StatusCode,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch casts from hub: {0}")]
    Fetch(String),

    #[error("Failed to decode hub response: {0}")]
    Decode(String),

    #[error("No embed URL matched the allowed image suffixes")]
    NoMatch,

    #[error("Failed to render template: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // Anything the upstream hub did wrong is a gateway failure.
            AppError::Fetch(msg) => {
                tracing::error!("Fetch error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Failed to fetch meme")
            }
            AppError::Decode(msg) => {
                tracing::error!("Decode error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Failed to fetch meme")
            }
            AppError::NoMatch => {
                tracing::error!("No matching embed URLs found");
                (StatusCode::BAD_GATEWAY, "Failed to fetch meme")
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render template")
            }
            AppError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error")
            }
        };

        (status, Html(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::Render(err.to_string())
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
