//! Shared record builders and proptest strategies for unit tests.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::model::UnicornRecord;

pub fn record(
    company: &str,
    valuation: f64,
    country: Option<&str>,
    city: Option<&str>,
    year: Option<i32>,
) -> UnicornRecord {
    let date = year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    let mut rec = UnicornRecord::new(company, valuation, date).unwrap();
    rec.country = country.map(str::to_string);
    rec.city = city.map(str::to_string);
    rec
}

pub fn dated(company: &str, y: i32, m: u32, d: u32) -> UnicornRecord {
    UnicornRecord::new(company, 1.0, NaiveDate::from_ymd_opt(y, m, d)).unwrap()
}

pub fn backed_by(company: &str, investors: &str) -> UnicornRecord {
    let mut rec = UnicornRecord::new(company, 1.0, None).unwrap();
    rec.select_investors = Some(investors.to_string());
    rec
}

const COUNTRIES: [&str; 3] = ["United States", "China", "Germany"];
const CITIES: [&str; 5] = ["San Francisco", "New York", "Beijing", "Shanghai", "Berlin"];
const INDUSTRIES: [&str; 4] = ["Fintech", "E-commerce", "Artificial intelligence", "Health"];

/// A record with a small, collision-prone domain so filters actually match.
pub fn arb_record() -> impl Strategy<Value = UnicornRecord> {
    (
        0.0f64..250.0,
        proptest::option::weighted(0.9, 0usize..COUNTRIES.len()),
        proptest::option::weighted(0.9, 0usize..CITIES.len()),
        proptest::option::weighted(0.9, 0usize..INDUSTRIES.len()),
        proptest::option::weighted(0.85, (2007i32..2023, 1u32..=12, 1u32..=28)),
    )
        .prop_map(|(valuation, country, city, industry, date)| {
            let date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
            let mut rec = UnicornRecord::new("Company", valuation, date).unwrap();
            rec.country = country.map(|i| COUNTRIES[i].to_string());
            rec.city = city.map(|i| CITIES[i].to_string());
            rec.industry = industry.map(|i| INDUSTRIES[i].to_string());
            rec
        })
}

pub fn arb_records() -> impl Strategy<Value = Vec<UnicornRecord>> {
    proptest::collection::vec(arb_record(), 0..60)
}

pub fn arb_country() -> impl Strategy<Value = Option<String>> {
    proptest::option::of((0usize..COUNTRIES.len()).prop_map(|i| COUNTRIES[i].to_string()))
}

pub fn arb_city() -> impl Strategy<Value = Option<String>> {
    proptest::option::of((0usize..CITIES.len()).prop_map(|i| CITIES[i].to_string()))
}
