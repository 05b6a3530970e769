use handlebars::Handlebars;
use crate::error::{AppError, Result};

pub const TEMPLATE_NAME: &str = "index";
const TEMPLATE_PATH: &str = "templates/index.hbs";

/// Builds the template registry once at startup. The page template lives at a
/// fixed relative path and is never re-parsed per request.
pub fn load_templates() -> Result<Handlebars<'static>> {
    let mut registry = Handlebars::new();
    registry
        .register_template_file(TEMPLATE_NAME, TEMPLATE_PATH)
        .map_err(|e| AppError::Config(format!("Failed to load template {}: {}", TEMPLATE_PATH, e)))?;
    Ok(registry)
}
