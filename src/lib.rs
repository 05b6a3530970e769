pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod templates;

use std::sync::Arc;
use handlebars::Handlebars;
use config::Config;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub templates: Arc<Handlebars<'static>>,
}
