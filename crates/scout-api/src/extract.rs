/// Primitive extractors: pull a price, brand, style, or retailer out of
/// free-form text. Coverage is deliberately narrow; extending it is a
/// data-table edit.
use regex::Regex;

/// Closed brand vocabulary. Membership is checked against single
/// capitalized-word tokens, so multi-word and all-caps entries only ever
/// match via the permissive first-token fallback.
const KNOWN_BRANDS: &[&str] = &[
    "Zara",
    "H&M",
    "ASOS",
    "Reformation",
    "Revolve",
    "Free People",
    "Anthropologie",
    "Nordstrom",
    "Mango",
    "Massimo Dutti",
    "COS",
    "Arket",
    "Everlane",
    "Aritzia",
    "Lulus",
    "Showpo",
    "Princess Polly",
    "Shein",
    "Fashion Nova",
    "PrettyLittleThing",
];

/// Ordered: the first keyword found wins.
const STYLES: &[&str] = &[
    "mini",
    "midi",
    "maxi",
    "bodycon",
    "a-line",
    "wrap",
    "shift",
    "fit and flare",
];

const RETAILER_DOMAINS: &[(&str, &str)] = &[
    ("depop.com", "Depop"),
    ("poshmark.com", "Poshmark"),
    ("zulily.com", "Zulily"),
    ("asos.com", "ASOS"),
    ("revolve.com", "Revolve"),
    ("nordstrom.com", "Nordstrom"),
    ("anthropologie.com", "Anthropologie"),
];

/// Extract a single price from text.
///
/// A `$40 - $60` range averages to 50; otherwise the first `$XX` or `$XX.XX`
/// token wins. The range pattern is checked first, else the `$40` token would
/// shadow it.
pub fn extract_price(text: &str) -> Option<f64> {
    let range_re = Regex::new(r"\$(\d+)\s*-\s*\$(\d+)").expect("valid regex");
    if let Some(caps) = range_re.captures(text) {
        let low: f64 = caps[1].parse().ok()?;
        let high: f64 = caps[2].parse().ok()?;
        return Some((low + high) / 2.0);
    }

    let price_re = Regex::new(r"\$(\d+(?:\.\d{2})?)").expect("valid regex");
    price_re
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// Every `$` price token in left-to-right order. Used where text may carry
/// both a sale and an original price.
pub fn extract_all_prices(text: &str) -> Vec<f64> {
    let price_re = Regex::new(r"\$(\d+(?:\.\d{2})?)").expect("valid regex");
    price_re
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect()
}

/// First capitalized word that is a known brand, else the first capitalized
/// word verbatim. The verbatim fallback is low-precision but kept: unbranded
/// listings still get a grouping key.
pub fn extract_brand(text: &str) -> Option<String> {
    let word_re = Regex::new(r"\b[A-Z][a-z]+\b").expect("valid regex");
    let mut first: Option<&str> = None;
    for m in word_re.find_iter(text) {
        let word = m.as_str();
        if KNOWN_BRANDS.contains(&word) {
            return Some(word.to_string());
        }
        if first.is_none() {
            first = Some(word);
        }
    }
    first.map(str::to_string)
}

/// Case-insensitive scan of the fixed style list; total function, falls back
/// to the literal "dress".
pub fn extract_style(text: &str) -> String {
    let lower = text.to_lowercase();
    for style in STYLES {
        if lower.contains(*style) {
            return (*style).to_string();
        }
    }
    "dress".to_string()
}

/// Retailer display name from a URL host. Unknown hosts derive a name from
/// the first DNS label; `None` only when no host parses at all.
pub fn extract_retailer(url: &str) -> Option<String> {
    let host_re = Regex::new(r"https?://(?:www\.)?([^/]+)").expect("valid regex");
    let host = host_re.captures(url)?.get(1)?.as_str();

    for (domain, name) in RETAILER_DOMAINS {
        if host == *domain {
            return Some((*name).to_string());
        }
    }

    let label = host.split('.').next()?;
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
