///! Autocomplete suggestions
///!
///! Collects individual matching field values (not whole artists), tagged
///! with where they came from, e.g. `"Brian May - member of Queen"`.
use groupie_common::{MergedArtist, SearchType, Suggestion};
use std::collections::HashSet;

use super::date::is_numeric;

/// Generate suggestions for a partial query.
///
/// The query is trimmed and lowercased; an empty query yields nothing.
/// Concert dates are only searched for all-digit queries. Output follows
/// artist order, then field order, with duplicates of the formatted value
/// dropped.
pub fn generate_suggestions(artists: &[MergedArtist], query: &str, search_type: SearchType) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let numeric = is_numeric(&query);
    let mut collector = SuggestionCollector::default();

    for entry in artists {
        let name = entry.artist.name.as_str();

        match search_type {
            SearchType::Name | SearchType::Other => {
                if contains_lower(name, &query) {
                    collector.add(name, "artist");
                }
            }
            SearchType::Location => collect_venues(&mut collector, entry, &query),
            SearchType::Date => {
                if numeric {
                    collect_concert_dates(&mut collector, entry, &query);
                }
            }
            SearchType::General => {
                if contains_lower(name, &query) {
                    collector.add(name, "artist");
                }

                for member in &entry.artist.members {
                    if contains_lower(member, &query) {
                        collector.add(member, &format!("member of {}", name));
                    }
                }

                if contains_lower(&entry.artist.first_album, &query) {
                    collector.add(&entry.artist.first_album, &format!("first album by {}", name));
                }

                let creation_year = entry.artist.creation_date.to_string();
                if creation_year.contains(&query) {
                    collector.add(&creation_year, &format!("creation year of {}", name));
                }

                if numeric {
                    collect_concert_dates(&mut collector, entry, &query);
                }

                collect_venues(&mut collector, entry, &query);
            }
        }
    }

    tracing::debug!(
        "Generated {} suggestions for '{}' ({})",
        collector.suggestions.len(),
        query,
        search_type
    );
    collector.suggestions
}

fn collect_venues(collector: &mut SuggestionCollector, entry: &MergedArtist, query: &str) {
    for venue in entry.performance_locations() {
        if contains_lower(venue, query) {
            collector.add(venue, &format!("venue for {}", entry.artist.name));
        }
    }
}

fn collect_concert_dates(collector: &mut SuggestionCollector, entry: &MergedArtist, query: &str) {
    for date in entry.relation_dates() {
        if date.contains(query) {
            collector.add(date, &format!("concert date for {}", entry.artist.name));
        }
    }
}

fn contains_lower(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(query)
}

#[derive(Default)]
struct SuggestionCollector {
    seen: HashSet<String>,
    suggestions: Vec<Suggestion>,
}

impl SuggestionCollector {
    /// Dedup key is the formatted value, so one input under two tags is kept twice
    fn add(&mut self, input: &str, tag: &str) {
        let value = format!("{} - {}", input, tag);
        if self.seen.insert(value.clone()) {
            self.suggestions.push(Suggestion {
                value,
                input: input.to_string(),
            });
        }
    }
}
