/// Aggregate pricing statistics, ROI projection, and the pricing-guide
/// heuristic. Pure functions over normalized listings; no hidden state.
use crate::error::AppError;
use crate::model::{
    DressListing, GuidePriceRange, PriceRange, PricingGuide, PricingIndicator, RoiCalculation,
};

pub const DEFAULT_RENTALS_PER_YEAR: u32 = 10;

const UNDERPRICED_RATIO: f64 = 0.1;
const PREMIUM_RATIO: f64 = 0.2;
const SUGGESTED_UNDERBID: f64 = 0.9;

/// Mean rental price rounded to the cent; 0 for an empty batch.
pub fn average_price(listings: &[DressListing]) -> f64 {
    if listings.is_empty() {
        return 0.0;
    }
    let sum: f64 = listings.iter().map(|l| l.rental_price).sum();
    round2(sum / listings.len() as f64)
}

/// Exact (unrounded) min/max of rental prices; {0, 0} for an empty batch.
pub fn price_range(listings: &[DressListing]) -> PriceRange {
    if listings.is_empty() {
        return PriceRange { min: 0.0, max: 0.0 };
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for listing in listings {
        min = min.min(listing.rental_price);
        max = max.max(listing.rental_price);
    }
    PriceRange { min, max }
}

/// Brand names ranked by frequency, descending. Counts are accumulated in
/// first-seen order and the sort is stable, so ties break toward the brand
/// encountered first.
pub fn top_brands(listings: &[DressListing], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for listing in listings {
        match counts.iter_mut().find(|(brand, _)| *brand == listing.brand) {
            Some((_, count)) => *count += 1,
            None => counts.push((listing.brand.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(brand, _)| brand).collect()
}

/// Project return on a dress purchase given the going rental rate.
///
/// Zero monthly income is an input-validation error, never an `Infinity`
/// leaking into JSON.
pub fn calculate_roi(
    purchase_price: f64,
    average_rental_price: f64,
    estimated_rentals_per_year: u32,
) -> Result<RoiCalculation, AppError> {
    let annual_income = average_rental_price * estimated_rentals_per_year as f64;
    let monthly_income = annual_income / 12.0;
    if monthly_income <= 0.0 {
        return Err(AppError::Validation(
            "Average rental price and rentals per year must be positive".to_string(),
        ));
    }

    Ok(RoiCalculation {
        purchase_price,
        average_rental_price,
        estimated_rentals_per_year,
        monthly_income: round2(monthly_income),
        break_even_months: round1(purchase_price / monthly_income),
        annual_profit: round2(annual_income - purchase_price),
    })
}

/// Recommend a rental price from comparable listings.
///
/// No comparables yields a neutral zeroed guide. `retail_price_paid` must be
/// positive once comparables exist (the ratio is undefined at zero).
pub fn generate_pricing_guide(
    similar_listings: &[DressListing],
    retail_price_paid: f64,
) -> Result<PricingGuide, AppError> {
    if similar_listings.is_empty() {
        return Ok(PricingGuide {
            price_range: GuidePriceRange {
                min: 0.0,
                max: 0.0,
                average: 0.0,
            },
            suggested_price: 0.0,
            pricing_indicator: PricingIndicator::FairlyPriced,
            similar_listings: Vec::new(),
        });
    }
    if retail_price_paid <= 0.0 {
        return Err(AppError::Validation(
            "Retail price paid must be positive".to_string(),
        ));
    }

    let average = average_price(similar_listings);
    let range = price_range(similar_listings);

    let ratio = average / retail_price_paid;
    let pricing_indicator = if ratio < UNDERPRICED_RATIO {
        PricingIndicator::Underpriced
    } else if ratio > PREMIUM_RATIO {
        PricingIndicator::Premium
    } else {
        PricingIndicator::FairlyPriced
    };

    Ok(PricingGuide {
        price_range: GuidePriceRange {
            min: range.min,
            max: range.max,
            average,
        },
        suggested_price: round2(average * SUGGESTED_UNDERBID),
        pricing_indicator,
        similar_listings: similar_listings.to_vec(),
    })
}

/// Round to 2 decimal places, half away from zero at the cent.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;

    fn listing(brand: &str, price: f64) -> DressListing {
        DressListing {
            id: String::new(),
            name: None,
            brand: brand.to_string(),
            style: "midi".to_string(),
            rental_price: price,
            condition: Condition::LikeNew,
            description: None,
            url: None,
            picture: None,
        }
    }

    #[test]
    fn average_price_empty_is_zero() {
        assert_eq!(average_price(&[]), 0.0);
    }

    #[test]
    fn average_price_rounds_to_cents() {
        let listings = [listing("Zara", 50.0), listing("Mango", 60.0)];
        assert_eq!(average_price(&listings), 55.0);

        let thirds = [listing("A", 10.0), listing("B", 10.0), listing("C", 11.0)];
        assert_eq!(average_price(&thirds), 10.33);
    }

    #[test]
    fn price_range_empty_is_zeroed() {
        let range = price_range(&[]);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 0.0);
    }

    #[test]
    fn price_range_bounds_every_price() {
        let listings = [listing("A", 35.0), listing("B", 80.0), listing("C", 42.0)];
        let range = price_range(&listings);
        assert_eq!(range.min, 35.0);
        assert_eq!(range.max, 80.0);
        for l in &listings {
            assert!(range.min <= l.rental_price && l.rental_price <= range.max);
        }
    }

    #[test]
    fn top_brands_count_descending_first_seen_tie_break() {
        let listings = [
            listing("A", 1.0),
            listing("B", 1.0),
            listing("A", 1.0),
            listing("C", 1.0),
            listing("B", 1.0),
            listing("A", 1.0),
        ];
        assert_eq!(top_brands(&listings, 2), vec!["A", "B"]);

        // B and C tie at 1; B was seen first.
        let tied = [listing("A", 1.0), listing("B", 1.0), listing("C", 1.0), listing("A", 1.0)];
        assert_eq!(top_brands(&tied, 5), vec!["A", "B", "C"]);
    }

    #[test]
    fn metrics_are_idempotent() {
        let listings = [listing("Zara", 45.0), listing("Mango", 55.0)];
        assert_eq!(average_price(&listings), average_price(&listings));
        assert_eq!(top_brands(&listings, 5), top_brands(&listings, 5));
    }

    #[test]
    fn roi_projection() {
        let roi = calculate_roi(100.0, 50.0, DEFAULT_RENTALS_PER_YEAR).unwrap();
        assert_eq!(roi.monthly_income, 41.67);
        assert_eq!(roi.break_even_months, 2.4);
        assert_eq!(roi.annual_profit, 400.0);
    }

    #[test]
    fn roi_rejects_zero_income() {
        assert!(calculate_roi(100.0, 0.0, 10).is_err());
        assert!(calculate_roi(100.0, 50.0, 0).is_err());
    }

    #[test]
    fn pricing_guide_neutral_without_comparables() {
        let guide = generate_pricing_guide(&[], 120.0).unwrap();
        assert_eq!(guide.suggested_price, 0.0);
        assert_eq!(guide.pricing_indicator, PricingIndicator::FairlyPriced);
        assert!(guide.similar_listings.is_empty());
    }

    #[test]
    fn pricing_guide_rejects_zero_retail_price() {
        let listings = [listing("Zara", 50.0)];
        assert!(generate_pricing_guide(&listings, 0.0).is_err());
    }

    #[test]
    fn pricing_guide_indicator_thresholds() {
        let listings = [listing("Zara", 40.0), listing("Zara", 60.0)];
        // average 50

        let fair = generate_pricing_guide(&listings, 300.0).unwrap();
        assert_eq!(fair.pricing_indicator, PricingIndicator::FairlyPriced);
        assert_eq!(fair.suggested_price, 45.0);
        assert_eq!(fair.price_range.average, 50.0);

        let premium = generate_pricing_guide(&listings, 100.0).unwrap();
        assert_eq!(premium.pricing_indicator, PricingIndicator::Premium);

        let underpriced = generate_pricing_guide(&listings, 600.0).unwrap();
        assert_eq!(underpriced.pricing_indicator, PricingIndicator::Underpriced);
    }
}
