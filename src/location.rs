//! Free-text location parsing and geocode candidate construction.
//!
//! A [`LocationQuery`] is built once per lookup from whatever the caller
//! typed ("Huntsville, AL", "paris", "Madison, Wisconsin, USA") and carries
//! the normalized display string, any detected US state or country suffix,
//! and the ordered list of query strings worth suggesting back to the caller.

/// US state and territory abbreviations (50 states + DC) mapped to the full
/// names the geocoding service reports as admin1.
const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Spellings accepted as a trailing United States suffix.
const COUNTRY_TOKENS: &[&str] = &["usa", "us", "united states", "united states of america"];

/// Look up the full state name for a two-letter abbreviation.
#[must_use]
pub fn state_name(abbreviation: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(code, _)| *code == abbreviation)
        .map(|(_, name)| *name)
}

/// Whether a single comma-part spells the United States.
#[must_use]
pub fn is_country_token(part: &str) -> bool {
    COUNTRY_TOKENS.contains(&part.trim().to_ascii_lowercase().as_str())
}

/// Remove one trailing country token from a comma-separated place string.
///
/// "Huntsville, Alabama, USA" becomes "Huntsville, Alabama"; strings without
/// a trailing token (or consisting of nothing but the token) pass through.
#[must_use]
pub fn strip_trailing_country(place: &str) -> String {
    let parts: Vec<&str> = place
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() > 1 && is_country_token(parts[parts.len() - 1]) {
        parts[..parts.len() - 1].join(", ")
    } else {
        place.trim().to_string()
    }
}

/// One geocoding attempt: a query string plus an optional ISO country-code
/// bias passed to the geocoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub query: String,
    pub country_bias: Option<String>,
}

/// A parsed free-text location request.
///
/// Detection of state and country happens exactly once, here; resolution
/// never re-derives them.
#[derive(Debug)]
pub struct LocationQuery {
    raw: String,
    detected_city: Option<String>,
    detected_state: Option<String>,
    country_bias: Option<String>,
    normalized: String,
    suggestions: Vec<String>,
}

impl LocationQuery {
    /// Parse user input. Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }

        let parts: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut query = Self {
            raw: raw.to_string(),
            detected_city: None,
            detected_state: None,
            country_bias: None,
            normalized: raw.to_string(),
            suggestions: Vec::new(),
        };

        // "City, ST" with a US state abbreviation
        if parts.len() == 2 {
            if let Some(full_name) = state_name(&parts[1].to_ascii_uppercase()) {
                let city = parts[0].to_string();
                query.normalized = format!("{city}, {full_name}");
                let suggestion = format!("{}, USA", query.normalized);
                query.push_suggestion(&suggestion);
                query.detected_city = Some(city);
                query.detected_state = Some(full_name.to_string());
                query.country_bias = Some("US".to_string());
            }
        }

        // "City, State, USA" and longer forms ending in a country token
        if parts.len() >= 3 && is_country_token(parts[parts.len() - 1]) {
            let head = &parts[..parts.len() - 1];
            query.country_bias = Some("US".to_string());
            query.normalized = head.join(", ");
            let suggestion = format!("{}, USA", query.normalized);
            query.push_suggestion(&suggestion);
            if head.len() >= 2 {
                query.detected_state = Some(head[head.len() - 1].to_string());
                query.detected_city = Some(head[..head.len() - 1].join(", "));
            }
        }

        let raw_suggestion = query.raw.clone();
        query.push_suggestion(&raw_suggestion);
        let normalized_suggestion = query.normalized.clone();
        query.push_suggestion(&normalized_suggestion);

        Some(query)
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn detected_city(&self) -> Option<&str> {
        self.detected_city.as_deref()
    }

    #[must_use]
    pub fn detected_state(&self) -> Option<&str> {
        self.detected_state.as_deref()
    }

    #[must_use]
    pub fn country_bias(&self) -> Option<&str> {
        self.country_bias.as_deref()
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Append a suggested query, keeping the list free of exact duplicates.
    pub fn push_suggestion(&mut self, suggestion: &str) {
        if !self.suggestions.iter().any(|s| s == suggestion) {
            self.suggestions.push(suggestion.to_string());
        }
    }

    #[must_use]
    pub fn into_suggestions(self) -> Vec<String> {
        self.suggestions
    }

    /// Geocode attempts in priority order: detected city with bias first,
    /// then normalized and raw strings biased, the same pair unbiased, and
    /// the detected city unbiased as a final fallback. Blank queries are
    /// skipped and repeated (query, bias) pairs keep their first slot.
    #[must_use]
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut push = |query: &str, bias: Option<&str>| {
            let query = query.trim();
            if query.is_empty() {
                return;
            }
            let candidate = Candidate {
                query: query.to_string(),
                country_bias: bias.map(ToString::to_string),
            };
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        };

        let bias = self.country_bias.as_deref();
        if let Some(city) = &self.detected_city {
            push(city, bias);
        }
        push(&self.normalized, bias);
        push(&self.raw, bias);
        push(&self.normalized, None);
        push(&self.raw, None);
        if let Some(city) = &self.detected_city {
            push(city, None);
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn candidate(query: &str, bias: Option<&str>) -> Candidate {
        Candidate {
            query: query.to_string(),
            country_bias: bias.map(ToString::to_string),
        }
    }

    #[rstest]
    #[case("AL", "Alabama")]
    #[case("WA", "Washington")]
    #[case("DC", "District of Columbia")]
    #[case("WY", "Wyoming")]
    fn state_abbreviations_expand(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(state_name(code), Some(expected));
    }

    #[test]
    fn unknown_abbreviation_is_not_a_state() {
        assert_eq!(state_name("ZZ"), None);
        assert_eq!(state_name("USA"), None);
    }

    #[rstest]
    #[case("USA", true)]
    #[case("us", true)]
    #[case("United States", true)]
    #[case("united states of america", true)]
    #[case("France", false)]
    #[case("U.S.", false)]
    fn country_token_detection(#[case] part: &str, #[case] expected: bool) {
        assert_eq!(is_country_token(part), expected);
    }

    #[test]
    fn blank_input_does_not_parse() {
        assert!(LocationQuery::parse("").is_none());
        assert!(LocationQuery::parse("   ").is_none());
    }

    #[test]
    fn two_part_input_expands_state() {
        let query = LocationQuery::parse("Huntsville, AL").unwrap();
        assert_eq!(query.detected_city(), Some("Huntsville"));
        assert_eq!(query.detected_state(), Some("Alabama"));
        assert_eq!(query.country_bias(), Some("US"));
        assert_eq!(query.normalized(), "Huntsville, Alabama");
        assert_eq!(
            query.suggestions(),
            &[
                "Huntsville, Alabama, USA".to_string(),
                "Huntsville, AL".to_string(),
                "Huntsville, Alabama".to_string(),
            ]
        );
    }

    #[test]
    fn lowercase_state_abbreviation_still_matches() {
        let query = LocationQuery::parse("huntsville, al").unwrap();
        assert_eq!(query.detected_state(), Some("Alabama"));
        assert_eq!(query.normalized(), "huntsville, Alabama");
    }

    #[test]
    fn foreign_two_part_input_is_left_alone() {
        let query = LocationQuery::parse("Paris, France").unwrap();
        assert_eq!(query.detected_city(), None);
        assert_eq!(query.detected_state(), None);
        assert_eq!(query.country_bias(), None);
        assert_eq!(query.normalized(), "Paris, France");
        assert_eq!(query.suggestions(), &["Paris, France".to_string()]);
        assert_eq!(query.candidates(), vec![candidate("Paris, France", None)]);
    }

    #[test]
    fn trailing_country_token_sets_bias_and_splits_city_state() {
        let query = LocationQuery::parse("Madison, Wisconsin, USA").unwrap();
        assert_eq!(query.country_bias(), Some("US"));
        assert_eq!(query.normalized(), "Madison, Wisconsin");
        assert_eq!(query.detected_state(), Some("Wisconsin"));
        assert_eq!(query.detected_city(), Some("Madison"));
        assert_eq!(query.suggestions()[0], "Madison, Wisconsin, USA");
        assert!(query.suggestions().contains(&"Madison, Wisconsin".to_string()));
    }

    #[test]
    fn multiword_country_token_is_recognized() {
        let query = LocationQuery::parse("Portland, Oregon, United States of America").unwrap();
        assert_eq!(query.country_bias(), Some("US"));
        assert_eq!(query.normalized(), "Portland, Oregon");
        assert_eq!(query.detected_state(), Some("Oregon"));
    }

    #[test]
    fn two_part_country_suffix_is_not_a_state() {
        // "USA" is not a two-letter abbreviation and the three-part rule
        // needs three parts, so nothing fires.
        let query = LocationQuery::parse("Somewhere, USA").unwrap();
        assert_eq!(query.detected_state(), None);
        assert_eq!(query.country_bias(), None);
        assert_eq!(query.normalized(), "Somewhere, USA");
    }

    #[test]
    fn empty_parts_are_discarded() {
        let query = LocationQuery::parse(" Huntsville ,, AL ,").unwrap();
        assert_eq!(query.detected_state(), Some("Alabama"));
        assert_eq!(query.normalized(), "Huntsville, Alabama");
    }

    #[test]
    fn suggestions_never_duplicate() {
        let mut query = LocationQuery::parse("Denver, CO").unwrap();
        let before = query.suggestions().len();
        query.push_suggestion("Denver, Colorado, USA");
        query.push_suggestion("Denver, CO");
        assert_eq!(query.suggestions().len(), before);
    }

    #[test]
    fn candidates_follow_priority_order() {
        let query = LocationQuery::parse("Huntsville, AL").unwrap();
        assert_eq!(
            query.candidates(),
            vec![
                candidate("Huntsville", Some("US")),
                candidate("Huntsville, Alabama", Some("US")),
                candidate("Huntsville, AL", Some("US")),
                candidate("Huntsville, Alabama", None),
                candidate("Huntsville, AL", None),
                candidate("Huntsville", None),
            ]
        );
    }

    #[test]
    fn duplicate_candidate_pairs_collapse() {
        // No rule fires, so normalized == raw and there is no bias: a single
        // distinct (query, bias) pair remains.
        let query = LocationQuery::parse("Reykjavik").unwrap();
        assert_eq!(query.candidates(), vec![candidate("Reykjavik", None)]);
    }

    #[rstest]
    #[case("Huntsville, Alabama, USA", "Huntsville, Alabama")]
    #[case("Huntsville, Alabama, united states", "Huntsville, Alabama")]
    #[case("Paris, France", "Paris, France")]
    #[case("USA", "USA")]
    #[case("  Boise, Idaho  ", "Boise, Idaho")]
    fn trailing_country_strip(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_trailing_country(input), expected);
    }
}
