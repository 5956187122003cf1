/// Fixed prompt and query templates, one per search type. The backend is
/// instructed to reply with JSON only; the parser still tolerates prose
/// around the array.

pub fn trend_prompt(query: &str) -> String {
    format!(
        r#"Search peer-to-peer dress rental marketplaces for listings matching "{query}".

Find 10 dresses currently available for rent. For each dress provide:
- name: brand and description (e.g. "Reformation Green Midi Dress")
- price: rental price (e.g. "$55")
- picture: image URL if available
- url: link to the listing

Return as a JSON array only:
[{{"name": "Brand Dress Name", "price": "$XX", "picture": "url", "url": "url"}}]

Extract real brand names (Zara, Reformation, Revolve, etc.) from the listings."#
    )
}

pub fn sourcing_prompt(brand: &str, style: &str) -> String {
    format!(
        r#"Search the web for places to BUY this dress in good condition at a price LOWER than its typical or historical price:
- Brand: {brand}
- Style/description: {style}

Return ONLY a JSON array of up to 8 items with:
- retailer: store or marketplace name (Depop, Poshmark, ASOS, etc.)
- item_name: listing title including brand and style
- condition: New / Like new / Good
- current_price: current asking price (USD, e.g. "$85")
- historical_price: typical or historical price (MSRP or average) if mentioned, otherwise an empty string
- url: direct link to the listing

Rules:
- Prefer listings clearly below historical price or MSRP
- Prefer "Like new" or "Good" condition
- Exclude items that are not dresses or are the wrong brand/style
- Return JSON only, no explanations or markdown."#
    )
}

pub fn roi_query(brand: &str, description: &str) -> String {
    format!("{brand} {description} dress average rental price")
}

pub fn pricing_query(brand: &str, description: &str) -> String {
    format!("{brand} {description} dress rental price")
}
