/// Normalizes raw search results into typed domain records.
///
/// Two-stage contract: locate a bracketed `[...]` substring in the FIRST
/// result's snippet and strict-parse it as JSON; on any failure, or when the
/// parsed array yields zero usable records, silently fall back to per-result
/// text extraction. The fallback is a normal degrade, never an error.
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use scout_common::search::RawSearchResult;

use crate::extract::{
    extract_all_prices, extract_brand, extract_price, extract_retailer, extract_style,
};
use crate::metrics::round2;
use crate::model::{Condition, DressListing, RetailSource};

// Heuristic markup when text only carries a single price token.
const ESTIMATED_MARKUP: f64 = 1.3;

/// Structured listing shape the backend is prompted to return.
/// Prices are strings ("$55"); a numeric price fails the strict parse and
/// routes the whole batch through the fallback path.
#[derive(Debug, Default, Deserialize)]
struct ListingPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RetailPayload {
    #[serde(default)]
    retailer: Option<String>,
    #[serde(default)]
    current_price: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    historical_price: Option<String>,
    #[serde(default)]
    msrp: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    availability: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Normalize search results into rental listings.
pub fn parse_listings(results: &[RawSearchResult]) -> Vec<DressListing> {
    if let Some(items) = structured_payload::<ListingPayload>(results) {
        let listings = structured_listings(&items);
        if !listings.is_empty() {
            return listings;
        }
        debug!("structured payload yielded no usable listings, using text extraction");
    }
    fallback_listings(results)
}

/// Normalize search results into discounted retail sources.
pub fn parse_retail_sources(results: &[RawSearchResult]) -> Vec<RetailSource> {
    if let Some(items) = structured_payload::<RetailPayload>(results) {
        let sources = structured_sources(&items);
        if !sources.is_empty() {
            return sources;
        }
        debug!("structured payload yielded no usable sources, using text extraction");
    }
    fallback_sources(results)
}

/// Locate and strict-parse an embedded JSON array in the first result's
/// snippet. Only the first result is inspected: the backend returns one
/// consolidated JSON-bearing reply.
fn structured_payload<T: for<'de> Deserialize<'de>>(results: &[RawSearchResult]) -> Option<Vec<T>> {
    let first = results.first()?;
    let array_re = Regex::new(r"(?s)\[.*\]").expect("valid regex");
    let raw = array_re.find(&first.snippet)?.as_str();
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => Some(items),
        Err(e) => {
            debug!(error = %e, "structured payload parse failed, using text extraction");
            None
        }
    }
}

fn structured_listings(items: &[ListingPayload]) -> Vec<DressListing> {
    let mut listings = Vec::new();
    for item in items {
        // Items without an extractable price are dropped, never emitted
        // with a null price.
        let Some(price) = item.price.as_deref().and_then(extract_price) else {
            continue;
        };
        let name = item
            .name
            .clone()
            .unwrap_or_else(|| "Unknown Dress".to_string());
        let brand = extract_brand(&name).unwrap_or_else(|| "Unknown".to_string());
        let style = extract_style(&name);

        listings.push(DressListing {
            id: format!("listing-{}", listings.len()),
            brand,
            style,
            rental_price: price,
            condition: Condition::LikeNew,
            description: Some(name.clone()),
            name: Some(name),
            url: item.url.clone(),
            picture: item.picture.clone(),
        });
    }
    listings
}

fn fallback_listings(results: &[RawSearchResult]) -> Vec<DressListing> {
    let mut listings = Vec::new();
    for result in results {
        let Some(price) =
            extract_price(&result.snippet).or_else(|| extract_price(&result.title))
        else {
            continue;
        };
        let brand = extract_brand(&result.title)
            .or_else(|| extract_brand(&result.snippet))
            .unwrap_or_else(|| "Unknown".to_string());
        let style = extract_style(&format!("{} {}", result.title, result.snippet));
        let name = if result.title.is_empty() {
            format!("{brand} {style} Dress")
        } else {
            result.title.clone()
        };

        listings.push(DressListing {
            // Positional within the emitted sequence, so skipped results
            // leave no gaps.
            id: format!("listing-{}", listings.len()),
            name: Some(name),
            brand,
            style,
            rental_price: price,
            condition: Condition::LikeNew,
            description: Some(result.snippet.clone()),
            url: Some(result.url.clone()),
            picture: None,
        });
    }
    listings
}

fn structured_sources(items: &[RetailPayload]) -> Vec<RetailSource> {
    let mut sources = Vec::new();
    for item in items {
        let sale = item
            .current_price
            .as_deref()
            .and_then(extract_price)
            .or_else(|| item.price.as_deref().and_then(extract_price));
        let Some(sale) = sale else {
            continue;
        };

        // Missing historical price means zero apparent discount.
        let original = item
            .historical_price
            .as_deref()
            .and_then(extract_price)
            .or_else(|| item.msrp.as_deref().and_then(extract_price))
            .unwrap_or(sale);

        let retailer = item
            .retailer
            .clone()
            .filter(|r| !r.is_empty())
            .or_else(|| item.url.as_deref().and_then(extract_retailer))
            .unwrap_or_else(|| "Unknown".to_string());

        sources.push(RetailSource {
            retailer,
            original_price: round2(original),
            sale_price: round2(sale),
            discount_percent: discount_percent(original, sale),
            url: item.url.clone(),
            availability: item.condition.clone().or_else(|| item.availability.clone()),
        });
    }
    sources
}

fn fallback_sources(results: &[RawSearchResult]) -> Vec<RetailSource> {
    let mut sources = Vec::new();
    for result in results {
        let Some(price) =
            extract_price(&result.snippet).or_else(|| extract_price(&result.title))
        else {
            continue;
        };
        let Some(retailer) = extract_retailer(&result.url) else {
            continue;
        };

        let prices = extract_all_prices(&format!("{} {}", result.snippet, result.title));
        let sale = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let sale = if prices.is_empty() { price } else { sale };
        let original = if prices.len() > 1 {
            prices.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        } else {
            sale * ESTIMATED_MARKUP
        };

        sources.push(RetailSource {
            retailer,
            original_price: round2(original),
            sale_price: round2(sale),
            discount_percent: discount_percent(original, sale),
            url: Some(result.url.clone()),
            availability: None,
        });
    }
    sources
}

fn discount_percent(original: f64, sale: f64) -> i64 {
    if original <= 0.0 {
        return 0;
    }
    (100.0 * (original - sale) / original).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, url: &str, snippet: &str) -> RawSearchResult {
        RawSearchResult {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn structured_listings_parse_from_first_snippet() {
        let snippet = r#"Here you go:
[{"name": "Reformation Green Midi Dress", "price": "$55", "picture": "pic", "url": "https://example.com/1"}]"#;
        let listings = parse_listings(&[result("", "", snippet)]);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "listing-0");
        assert_eq!(listings[0].brand, "Reformation");
        assert_eq!(listings[0].style, "midi");
        assert_eq!(listings[0].rental_price, 55.0);
        assert_eq!(listings[0].condition, Condition::LikeNew);
        assert_eq!(listings[0].picture.as_deref(), Some("pic"));
    }

    #[test]
    fn structured_listings_drop_priceless_items_and_reindex() {
        let snippet = r#"[
            {"name": "Zara Mini Dress", "price": "no price"},
            {"name": "Aritzia Wrap Dress", "price": "$72"}
        ]"#;
        let listings = parse_listings(&[result("", "", snippet)]);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "listing-0");
        assert_eq!(listings[0].brand, "Aritzia");
    }

    #[test]
    fn malformed_array_falls_back_to_text_extraction() {
        let results = [
            result(
                "Zara Midi Dress",
                "https://example.com/a",
                "[{broken json} rent for $45",
            ),
        ];
        let listings = parse_listings(&results);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].brand, "Zara");
        assert_eq!(listings[0].style, "midi");
        assert_eq!(listings[0].rental_price, 45.0);
    }

    #[test]
    fn empty_structured_array_falls_back() {
        let results = [
            result("", "", "[]"),
            result("Zara Mini Dress", "https://example.com/b", "rent for $30"),
        ];
        let listings = parse_listings(&results);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].brand, "Zara");
        assert_eq!(listings[0].rental_price, 30.0);
    }

    #[test]
    fn fallback_listings_skip_results_without_price() {
        let results = [
            result("Editorial: dress trends", "https://example.com/1", "no numbers"),
            result(
                "Mango Maxi Dress",
                "https://example.com/2",
                "available at $38 weekly",
            ),
        ];
        let listings = parse_listings(&results);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "listing-0");
        assert_eq!(listings[0].name.as_deref(), Some("Mango Maxi Dress"));
        assert_eq!(listings[0].url.as_deref(), Some("https://example.com/2"));
    }

    #[test]
    fn structured_sources_compute_discount_from_historical_price() {
        let snippet = r#"[{
            "retailer": "Depop",
            "item_name": "Reformation Midi",
            "condition": "Like new",
            "current_price": "$60",
            "historical_price": "$120",
            "url": "https://depop.com/item"
        }]"#;
        let sources = parse_retail_sources(&[result("", "", snippet)]);

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].retailer, "Depop");
        assert_eq!(sources[0].sale_price, 60.0);
        assert_eq!(sources[0].original_price, 120.0);
        assert_eq!(sources[0].discount_percent, 50);
        assert_eq!(sources[0].availability.as_deref(), Some("Like new"));
    }

    #[test]
    fn structured_sources_default_historical_to_sale() {
        let snippet = r#"[{"current_price": "$85", "url": "https://poshmark.com/item"}]"#;
        let sources = parse_retail_sources(&[result("", "", snippet)]);

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].retailer, "Poshmark");
        assert_eq!(sources[0].original_price, 85.0);
        assert_eq!(sources[0].discount_percent, 0);
    }

    #[test]
    fn fallback_sources_take_min_and_max_of_all_prices() {
        let results = [result(
            "Zara dress on sale",
            "https://www.depop.com/listing",
            "Now $40, originally $80",
        )];
        let sources = parse_retail_sources(&results);

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].retailer, "Depop");
        assert_eq!(sources[0].sale_price, 40.0);
        assert_eq!(sources[0].original_price, 80.0);
        assert_eq!(sources[0].discount_percent, 50);
    }

    #[test]
    fn fallback_sources_estimate_original_from_single_price() {
        let results = [result(
            "Mango dress",
            "https://outletshop.net/d",
            "only $50 today",
        )];
        let sources = parse_retail_sources(&results);

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].retailer, "Outletshop");
        assert_eq!(sources[0].sale_price, 50.0);
        assert_eq!(sources[0].original_price, 65.0);
        assert_eq!(sources[0].discount_percent, 23);
    }

    #[test]
    fn fallback_sources_skip_results_without_retailer() {
        let results = [result("Some dress", "not a url", "cheap at $20")];
        assert!(parse_retail_sources(&results).is_empty());
    }
}
