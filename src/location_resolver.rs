//! Location Resolution Module
//!
//! Turns free-text place names into coordinates by trying geocode candidates
//! in priority order until one yields results, then narrowing by detected
//! state. Transport failures are remembered but never abort the chain; a
//! later success always wins.

use anyhow::Error;
use tracing::debug;

use crate::geocode::{GeocodeLookup, GeocodeMatch};
use crate::location::{LocationQuery, strip_trailing_country};

/// Outcome of one resolution pass. Every variant carries the suggested
/// queries accumulated so far so the caller can offer a retry.
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// A candidate query returned results and one was selected.
    Resolved {
        place: GeocodeMatch,
        suggestions: Vec<String>,
    },
    /// Every candidate returned an empty result set without a transport error.
    NotFound { suggestions: Vec<String> },
    /// Invalid input, or the last transport failure when no candidate succeeded.
    Failed {
        message: String,
        suggestions: Vec<String>,
    },
}

/// Service for resolving free-text locations via a geocoding lookup.
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve `input` against `geocoder`, trying each candidate in order
    /// and stopping at the first non-empty result set.
    pub async fn resolve(geocoder: &dyn GeocodeLookup, input: &str) -> ResolutionOutcome {
        let Some(mut query) = LocationQuery::parse(input) else {
            return ResolutionOutcome::Failed {
                message: "Location cannot be empty. Give me a place like \"Huntsville, AL\"."
                    .to_string(),
                suggestions: Vec::new(),
            };
        };

        let candidates = query.candidates();
        let mut last_error: Option<Error> = None;
        let mut matched: Option<GeocodeMatch> = None;

        for candidate in candidates {
            // Re-normalize defensively: a biased candidate that still ends
            // in a country token would otherwise confuse the name search.
            let lookup_query = if candidate.country_bias.is_some() {
                strip_trailing_country(&candidate.query)
            } else {
                candidate.query.clone()
            };

            debug!(query = %lookup_query, bias = ?candidate.country_bias, "Trying geocode candidate");
            let results = match geocoder
                .search(&lookup_query, candidate.country_bias.as_deref())
                .await
            {
                Ok(results) => results,
                Err(error) => {
                    debug!(query = %lookup_query, "Geocode candidate failed: {error:#}");
                    last_error = Some(error);
                    continue;
                }
            };

            if results.is_empty() {
                continue;
            }

            // Narrow to the detected state when possible; an empty filter
            // falls back to everything the candidate returned.
            let selected: Vec<&GeocodeMatch> = match query.detected_state() {
                Some(state) => {
                    let in_state: Vec<&GeocodeMatch> = results
                        .iter()
                        .filter(|r| {
                            r.admin1
                                .as_deref()
                                .is_some_and(|admin1| admin1.eq_ignore_ascii_case(state))
                        })
                        .collect();
                    if in_state.is_empty() {
                        results.iter().collect()
                    } else {
                        in_state
                    }
                }
                None => results.iter().collect(),
            };

            for result in &selected {
                query.push_suggestion(&result.display_name());
            }
            matched = Some(selected[0].clone());
            break;
        }

        match matched {
            Some(place) => ResolutionOutcome::Resolved {
                place,
                suggestions: query.into_suggestions(),
            },
            None => match last_error {
                Some(error) => ResolutionOutcome::Failed {
                    message: format!("Location lookup failed for \"{}\": {error:#}", query.raw()),
                    suggestions: query.into_suggestions(),
                },
                None => ResolutionOutcome::NotFound {
                    suggestions: query.into_suggestions(),
                },
            },
        }
    }
}
