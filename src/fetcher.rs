use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use crate::error::{AppError, Result};

/// Embed URL suffixes that qualify as a displayable meme. Matching is exact
/// and case-sensitive; no extension normalization happens.
const IMAGE_SUFFIXES: [&str; 3] = [".png", ".jpg", ".gif"];

// Create a static client to reuse connections. Deliberately no request
// timeout: a hung hub blocks only the request that triggered the fetch.
static CLIENT: Lazy<Client> = Lazy::new(Client::new);

#[derive(Debug, Default, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub url: String,
}

/// Body of a cast-add message. Only `embeds` matters here; the rest is
/// decoded to mirror the hub schema and goes unused.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CastBody {
    pub embeds_deprecated: Vec<String>,
    pub mentions: Vec<i64>,
    pub parent_url: String,
    pub text: String,
    pub mentions_positions: Vec<i16>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CastData {
    #[serde(rename = "type")]
    pub kind: String,
    pub fid: i64,
    pub timestamp: i64,
    pub network: String,
    pub cast_add_body: CastBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CastMessage {
    pub data: CastData,
    pub hash: String,
    pub hash_scheme: String,
    pub signature_scheme: String,
    pub signer: String,
}

/// Top-level payload of the hub's `castsByParent` endpoint. The pagination
/// token is decoded but never followed.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemeResponse {
    pub messages: Vec<CastMessage>,
    pub next_page_token: String,
}

/// Fetches the cast list from the hub and returns every qualifying embed URL.
/// Errors with `NoMatch` when the hub answered but nothing qualified.
pub async fn fetch_meme_urls(hub_url: &str) -> Result<Vec<String>> {
    let response = CLIENT.get(hub_url).send().await?;

    // Read the whole body first so transport and decode failures stay
    // distinguishable.
    let body = response.text().await?;
    let api_response: MemeResponse = serde_json::from_str(&body)?;

    let matching = qualifying_urls(&api_response);
    if matching.is_empty() {
        return Err(AppError::NoMatch);
    }
    Ok(matching)
}

/// Picks one URL uniformly at random. The generator is injected so tests can
/// supply a seeded one.
pub fn select_meme(urls: &[String], rng: &mut impl Rng) -> Result<String> {
    let selected = urls.choose(rng).cloned().ok_or(AppError::NoMatch)?;
    tracing::info!("Selected meme: {}", selected);
    Ok(selected)
}

/// Collects every embed URL across all messages whose suffix is `.png`,
/// `.jpg`, or `.gif`.
pub fn qualifying_urls(response: &MemeResponse) -> Vec<String> {
    let mut matching = Vec::new();
    for message in &response.messages {
        for embed in &message.data.cast_add_body.embeds {
            if IMAGE_SUFFIXES.iter().any(|s| embed.url.ends_with(s)) {
                tracing::debug!("Found matching URL: {}", embed.url);
                matching.push(embed.url.clone());
            }
        }
    }
    matching
}
