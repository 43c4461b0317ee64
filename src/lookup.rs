//! Region, category, date-range and language tables
//!
//! Validation turns loosely-typed user input into the canonical form used for
//! requests and cache keys. Anything unrecognized is an `InvalidParameter`.

use chrono::NaiveDate;

use crate::error::FetchError;

/// Country codes the trending feed is published for
pub const COUNTRIES: &[&str] = &[
    "AE", "AR", "AT", "AU", "BD", "BE", "BG", "BO", "BR", "BY", "CA", "CH", "CL", "CN", "CO",
    "CR", "CY", "CZ", "DE", "DK", "DO", "DZ", "EC", "EE", "EG", "ES", "ET", "FI", "FR", "GB",
    "GH", "GR", "GT", "HK", "HN", "HR", "HU", "ID", "IE", "IL", "IN", "IQ", "IR", "IS", "IT",
    "JM", "JO", "JP", "KE", "KH", "KR", "KW", "KZ", "LB", "LK", "LT", "LU", "LV", "MA", "MD",
    "MM", "MT", "MX", "MY", "NG", "NI", "NL", "NO", "NP", "NZ", "OM", "PA", "PE", "PH", "PK",
    "PL", "PR", "PT", "PY", "QA", "RO", "RS", "RU", "SA", "SD", "SE", "SG", "SI", "SK", "SN",
    "SV", "SY", "TH", "TN", "TR", "TW", "TZ", "UA", "UG", "US", "UY", "UZ", "VE", "VN", "YE",
    "ZA", "ZM", "ZW", "AZ", "GE", "AM", "AL", "BA", "MK", "ME", "KG", "MN", "LA", "BH", "LY",
];

/// US state and district codes in `US-XX` form
pub const US_STATES: &[&str] = &[
    "US-AL", "US-AK", "US-AZ", "US-AR", "US-CA", "US-CO", "US-CT", "US-DE", "US-DC", "US-FL",
    "US-GA", "US-HI", "US-ID", "US-IL", "US-IN", "US-IA", "US-KS", "US-KY", "US-LA", "US-ME",
    "US-MD", "US-MA", "US-MI", "US-MN", "US-MS", "US-MO", "US-MT", "US-NE", "US-NV", "US-NH",
    "US-NJ", "US-NM", "US-NY", "US-NC", "US-ND", "US-OH", "US-OK", "US-OR", "US-PA", "US-RI",
    "US-SC", "US-SD", "US-TN", "US-TX", "US-UT", "US-VT", "US-VA", "US-WA", "US-WV", "US-WI",
    "US-WY",
];

/// Category ids understood by the explore export
pub const EXPLORE_CATEGORIES: &[(&str, u32)] = &[
    ("all", 0),
    ("arts_entertainment", 3),
    ("autos_vehicles", 47),
    ("beauty_fitness", 44),
    ("books_literature", 22),
    ("business_industrial", 12),
    ("computers_electronics", 5),
    ("finance", 7),
    ("food_drink", 71),
    ("games", 8),
    ("health", 45),
    ("hobbies_leisure", 65),
    ("home_garden", 11),
    ("internet_telecom", 13),
    ("jobs_education", 958),
    ("law_government", 19),
    ("news", 16),
    ("online_communities", 299),
    ("people_society", 14),
    ("pets_animals", 66),
    ("real_estate", 29),
    ("reference", 533),
    ("science", 174),
    ("shopping", 18),
    ("sports", 20),
    ("travel", 67),
    ("ai_ml", 1299),
    ("computer_security", 314),
    ("investing", 107),
    ("politics", 396),
    ("banking", 37),
    ("accounting", 278),
];

/// Date range presets for the explore export
pub const DATE_PRESETS: &[&str] = &[
    "today 5-y",
    "today 12-m",
    "today 3-m",
    "today 1-m",
    "now 7-d",
    "now 1-d",
];

/// Validate a region code, returning it uppercased.
pub fn validate_geo(geo: &str) -> Result<String, FetchError> {
    let geo = geo.trim().to_uppercase();

    if COUNTRIES.contains(&geo.as_str()) || US_STATES.contains(&geo.as_str()) {
        return Ok(geo);
    }

    let similar: Vec<&str> = match geo.chars().next() {
        Some(first) => COUNTRIES
            .iter()
            .chain(US_STATES.iter())
            .filter(|code| code.starts_with(first))
            .take(5)
            .copied()
            .collect(),
        None => Vec::new(),
    };

    let mut msg = format!("Invalid geo code '{}'.", geo);
    if !similar.is_empty() {
        msg.push_str(&format!(" Did you mean one of: {}?", similar.join(", ")));
    }
    msg.push_str(&format!(
        " Available: {} countries (US, CA, GB, DE, ...) or {} US states (US-CA, US-NY, ...)",
        COUNTRIES.len(),
        US_STATES.len()
    ));
    Err(FetchError::InvalidParameter(msg))
}

/// Validate an explore date range: a preset or `YYYY-MM-DD YYYY-MM-DD`.
pub fn validate_date_range(date_range: &str) -> Result<String, FetchError> {
    let date_range = date_range.trim();

    if DATE_PRESETS.contains(&date_range) {
        return Ok(date_range.to_string());
    }

    let invalid = || {
        FetchError::InvalidParameter(format!(
            "Invalid date_range '{}'. Valid presets: {}; or a custom range 'YYYY-MM-DD YYYY-MM-DD'",
            date_range,
            DATE_PRESETS.join(", ")
        ))
    };

    let (start, end) = date_range.split_once(' ').ok_or_else(invalid)?;
    let parse = |s: &str| {
        if s.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    };
    let (Some(start_date), Some(end_date)) = (parse(start), parse(end)) else {
        return Err(invalid());
    };

    if start_date > end_date {
        return Err(FetchError::InvalidParameter(format!(
            "Invalid date_range '{}': start date is after end date",
            date_range
        )));
    }

    Ok(format!("{} {}", start, end))
}

/// Resolve an explore category name or numeric id.
///
/// Returns `None` for "all" / 0, which means no category filter.
pub fn validate_explore_category(category: &str) -> Result<Option<u32>, FetchError> {
    let normalized = category.trim().to_lowercase().replace([' ', '-'], "_");

    let id = match EXPLORE_CATEGORIES
        .iter()
        .find(|(name, _)| *name == normalized)
    {
        Some((_, id)) => *id,
        None => normalized.parse::<u32>().map_err(|_| {
            let mut names: Vec<&str> = EXPLORE_CATEGORIES.iter().map(|(n, _)| *n).collect();
            names.sort_unstable();
            FetchError::InvalidParameter(format!(
                "Invalid explore category '{}'. Available categories: {}; or a numeric category id",
                category,
                names.join(", ")
            ))
        })?,
    };

    Ok(if id == 0 { None } else { Some(id) })
}

/// Validate a language tag such as `en` or `en-US`, normalizing its case.
pub fn validate_language(hl: &str) -> Result<String, FetchError> {
    let hl = hl.trim();
    let invalid = || {
        FetchError::InvalidParameter(format!(
            "Invalid language '{}'. Expected a code like 'en' or 'en-US'",
            hl
        ))
    };

    let (lang, region) = match hl.split_once('-') {
        Some((lang, region)) => (lang, Some(region)),
        None => (hl, None),
    };

    if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    match region {
        None => Ok(lang.to_lowercase()),
        Some(region) if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) => {
            Ok(format!("{}-{}", lang.to_lowercase(), region.to_uppercase()))
        }
        Some(_) => Err(invalid()),
    }
}
