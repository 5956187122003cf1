use serde::{Deserialize, Serialize};

pub use scout_common::search::RawSearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
}

/// A normalized peer-to-peer rental listing.
///
/// `id` is positional within one response batch ("listing-0", "listing-1",
/// ...) and is not stable across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DressListing {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub brand: String,
    pub style: String,
    pub rental_price: f64,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// A normalized discounted retail source for a dress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailSource {
    pub retailer: String,
    pub original_price: f64,
    pub sale_price: f64,
    pub discount_percent: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsResponse {
    pub listings: Vec<DressListing>,
    pub average_price: f64,
    pub price_range: PriceRange,
    pub top_brands: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SourcingResponse {
    pub sources: Vec<RetailSource>,
}

#[derive(Debug, Serialize)]
pub struct RawResultsResponse {
    pub results: Vec<RawSearchResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiCalculation {
    pub purchase_price: f64,
    pub average_rental_price: f64,
    pub estimated_rentals_per_year: u32,
    pub monthly_income: f64,
    pub break_even_months: f64,
    pub annual_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingIndicator {
    Underpriced,
    FairlyPriced,
    Premium,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GuidePriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingGuide {
    pub price_range: GuidePriceRange,
    pub suggested_price: f64,
    pub pricing_indicator: PricingIndicator,
    pub similar_listings: Vec<DressListing>,
}
