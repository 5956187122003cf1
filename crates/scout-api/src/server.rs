use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::info;

use scout_common::search::SearchProvider;

use crate::error::AppError;
use crate::extract::{extract_brand, extract_style};
use crate::metrics::{average_price, price_range, top_brands};
use crate::model::{RawResultsResponse, SourcingResponse, TrendsResponse};
use crate::parser::{parse_listings, parse_retail_sources};
use crate::prompts;
use crate::rate_limit::RateLimiter;

const MAX_QUERY_LEN: usize = 500;
const MAX_LISTINGS: usize = 10;
const TOP_BRAND_LIMIT: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SearchProvider>,
    pub limiter: RateLimiter,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search_handler))
        .with_state(state)
}

/// One endpoint, three shapes: `trends` runs listing normalization plus
/// metrics, `sourcing` runs retail-source normalization, anything else
/// passes the raw search results through.
///
/// The body is taken as a string and inspected dynamically so a missing or
/// non-string query surfaces as a 400 validation error, and so the
/// rate-limit gate runs before any body validation.
async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    let key = client_key(&headers);
    if !state.limiter.check_and_increment(&key, Instant::now()).await {
        return Err(AppError::RateLimited);
    }

    let body: Value = serde_json::from_str(&body)
        .map_err(|_| AppError::Validation("Request body must be JSON".to_string()))?;

    let query = body
        .get("query")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::Validation("Query is required and must be a string".to_string())
        })?;
    if query.is_empty() {
        return Err(AppError::Validation("Query must not be empty".to_string()));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::Validation(
            "Query is too long. Maximum 500 characters.".to_string(),
        ));
    }
    let search_type = body.get("type").and_then(Value::as_str).unwrap_or("");

    let prompt = build_prompt(query, search_type);
    let results = state.provider.search(&prompt).await?;

    match search_type {
        "trends" => {
            let listings = parse_listings(&results);
            info!(query, listings = listings.len(), "trend search complete");
            // Metrics are computed over the full batch; only the listing
            // payload is truncated.
            let response = TrendsResponse {
                average_price: average_price(&listings),
                price_range: price_range(&listings),
                top_brands: top_brands(&listings, TOP_BRAND_LIMIT),
                listings: listings.into_iter().take(MAX_LISTINGS).collect(),
            };
            Ok(Json(response).into_response())
        }
        "sourcing" => {
            let sources = parse_retail_sources(&results);
            info!(query, sources = sources.len(), "sourcing search complete");
            Ok(Json(SourcingResponse { sources }).into_response())
        }
        _ => Ok(Json(RawResultsResponse { results }).into_response()),
    }
}

fn build_prompt(query: &str, search_type: &str) -> String {
    match search_type {
        "trends" => prompts::trend_prompt(query),
        "sourcing" | "roi" | "pricing" => {
            let brand = extract_brand(query).unwrap_or_else(|| "Unknown".to_string());
            let style = extract_style(query);
            match search_type {
                "sourcing" => prompts::sourcing_prompt(&brand, &style),
                "roi" => prompts::roi_query(&brand, &style),
                _ => prompts::pricing_query(&brand, &style),
            }
        }
        _ => query.to_string(),
    }
}

/// First `x-forwarded-for` entry, else a shared "unknown" bucket.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
