///! Filter engine for the artist listing
///!
///! Every stage is a pure narrowing predicate; `apply_filters` runs them in a
///! fixed order: free text, member count, creation year, first-album year,
///! performance locations.
use groupie_common::{Filters, MergedArtist, SearchType};
use serde::{Deserialize, Serialize};

use super::date::extract_year;

/// Year bounds used when a request omits a range parameter or sends garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefaults {
    #[serde(default = "default_year_min")]
    pub creation_min: i32,
    #[serde(default = "default_year_max")]
    pub creation_max: i32,
    #[serde(default = "default_year_min")]
    pub album_min: i32,
    #[serde(default = "default_year_max")]
    pub album_max: i32,
}

fn default_year_min() -> i32 {
    1900
}

fn default_year_max() -> i32 {
    2100
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            creation_min: default_year_min(),
            creation_max: default_year_max(),
            album_min: default_year_min(),
            album_max: default_year_max(),
        }
    }
}

/// Build [`Filters`] from raw query pairs.
///
/// Recognized keys: `search`, `searchType`, `creationMin`, `creationMax`,
/// `albumMin`, `albumMax`, `bandMembers` and `locations` (both repeatable).
/// Single-valued keys take their first occurrence. Integers that fail to
/// parse fall back to `defaults`; blank repeatable values are skipped.
pub fn parse_filters(pairs: &[(String, String)], defaults: &FilterDefaults) -> Filters {
    let first = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let all = |key: &str| -> Vec<String> {
        pairs
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    };
    let int_or = |key: &str, fallback: i32| {
        first(key)
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(fallback)
    };

    Filters {
        search_query: first("search").unwrap_or_default().to_string(),
        search_type: SearchType::parse(first("searchType").unwrap_or_default()),
        creation_min: int_or("creationMin", defaults.creation_min),
        creation_max: int_or("creationMax", defaults.creation_max),
        album_min: int_or("albumMin", defaults.album_min),
        album_max: int_or("albumMax", defaults.album_max),
        band_members: all("bandMembers"),
        locations: all("locations"),
    }
}

/// Run the whole pipeline. Stages with an empty input (query, member set,
/// location list) are skipped; the two year ranges always apply.
pub fn apply_filters<'a>(artists: &'a [MergedArtist], filters: &Filters) -> Vec<&'a MergedArtist> {
    let mut filtered: Vec<&MergedArtist> = artists.iter().collect();

    if !filters.search_query.is_empty() {
        let query = filters.search_query.to_lowercase();
        filtered.retain(|entry| matches_search(entry, &query, filters.search_type));
    }

    if !filters.band_members.is_empty() {
        filtered.retain(|entry| matches_band_members(entry, &filters.band_members));
    }

    filtered.retain(|entry| matches_creation_year(entry, filters.creation_min, filters.creation_max));
    filtered.retain(|entry| matches_album_year(entry, filters.album_min, filters.album_max));

    if !filters.locations.is_empty() {
        filtered.retain(|entry| matches_locations(entry, &filters.locations));
    }

    tracing::debug!("Filters kept {} of {} artists", filtered.len(), artists.len());
    filtered
}

/// Free-text predicate. `query` must already be lowercase.
pub fn matches_search(entry: &MergedArtist, query: &str, search_type: SearchType) -> bool {
    let artist = &entry.artist;

    match search_type {
        SearchType::Name => contains_lower(&artist.name, query) || any_contains_lower(&artist.members, query),
        SearchType::Location => any_contains_lower(&entry.location.locations, query),
        SearchType::Date => any_contains_lower(&entry.dates.dates, query),
        SearchType::General => {
            contains_lower(&artist.name, query)
                || any_contains_lower(&artist.members, query)
                || contains_lower(&artist.first_album, query)
                || artist.creation_date.to_string().contains(query)
                || any_contains_lower(&entry.dates.dates, query)
                || any_contains_lower(&entry.location.locations, query)
        }
        SearchType::Other => contains_lower(&artist.name, query),
    }
}

/// Member count, as a decimal string, is one of `counts`
pub fn matches_band_members(entry: &MergedArtist, counts: &[String]) -> bool {
    let count = entry.member_count().to_string();
    counts.iter().any(|c| *c == count)
}

/// Inclusive creation-year range
pub fn matches_creation_year(entry: &MergedArtist, min: i32, max: i32) -> bool {
    (min..=max).contains(&entry.artist.creation_date)
}

/// Inclusive first-album-year range. An unparseable first-album date never
/// matches.
pub fn matches_album_year(entry: &MergedArtist, min: i32, max: i32) -> bool {
    match extract_year(&entry.artist.first_album) {
        Ok(year) => (min..=max).contains(&year),
        Err(e) => {
            tracing::warn!(
                "Excluding artist '{}' from album-year filter: {}",
                entry.artist.name,
                e
            );
            false
        }
    }
}

/// Every wanted location matches at least one performance location
pub fn matches_locations(entry: &MergedArtist, wanted: &[String]) -> bool {
    wanted
        .iter()
        .all(|w| entry.performance_locations().any(|candidate| location_matches(candidate, w)))
}

/// Case-insensitive, trimmed substring match of one wanted location.
///
/// `"city/state, country"` requires both halves in the candidate; a wanted
/// value with more than one comma never matches.
pub fn location_matches(candidate: &str, wanted: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let wanted = wanted.trim().to_lowercase();

    if wanted.contains(',') {
        let parts: Vec<&str> = wanted.split(',').collect();
        if parts.len() != 2 {
            return false;
        }
        let place = parts[0].trim();
        let country = parts[1].trim();
        candidate.contains(place) && candidate.contains(country)
    } else {
        candidate.contains(&wanted)
    }
}

fn contains_lower(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(query)
}

fn any_contains_lower(items: &[String], query: &str) -> bool {
    items.iter().any(|item| contains_lower(item, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use groupie_common::{Artist, Relations};
    use std::collections::BTreeMap;

    fn entity(id: u32, name: &str, creation: i32, album: &str, members: &[&str]) -> MergedArtist {
        MergedArtist {
            artist: Artist {
                id,
                name: name.to_string(),
                creation_date: creation,
                first_album: album.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn with_venues(mut entry: MergedArtist, venues: &[&str]) -> MergedArtist {
        let mut dates_locations = BTreeMap::new();
        for venue in venues {
            dates_locations.insert(venue.to_string(), vec!["01-01-2020".to_string()]);
        }
        entry.relations = Relations {
            id: entry.artist.id,
            dates_locations,
        };
        entry
    }

    fn sample() -> Vec<MergedArtist> {
        vec![
            entity(1, "A", 1990, "01-01-1991", &["x", "y"]),
            entity(2, "B", 2005, "01-01-2006", &["z"]),
        ]
    }

    fn ids(result: &[&MergedArtist]) -> Vec<u32> {
        result.iter().map(|m| m.id()).collect()
    }

    #[test]
    fn test_creation_range() {
        let data = sample();
        let filters = Filters {
            creation_min: 1980,
            creation_max: 2000,
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1]);
    }

    #[test]
    fn test_creation_range_is_inclusive() {
        let data = sample();
        let filters = Filters {
            creation_min: 1990,
            creation_max: 2005,
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1, 2]);
    }

    #[test]
    fn test_band_members() {
        let data = sample();
        let filters = Filters {
            band_members: vec!["1".to_string()],
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2]);

        let filters = Filters {
            band_members: vec!["1".to_string(), "2".to_string()],
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1, 2]);
    }

    #[test]
    fn test_album_range() {
        let data = sample();
        let filters = Filters {
            album_min: 2000,
            album_max: 2010,
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2]);
    }

    #[test]
    fn test_unparseable_album_date_is_excluded() {
        let mut data = sample();
        data.push(entity(3, "C", 1995, "sometime in 1996", &["w"]));

        let result = apply_filters(&data, &Filters::unbounded());
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_location_city_country() {
        let data = vec![
            with_venues(entity(1, "A", 1990, "01-01-1991", &["x"]), &["paris-france"]),
            with_venues(entity(2, "B", 1990, "01-01-1991", &["x"]), &["paris-texas-usa"]),
            with_venues(entity(3, "C", 1990, "01-01-1991", &["x"]), &["lyon-france"]),
        ];
        let filters = Filters {
            locations: vec!["Paris, France".to_string()],
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1]);
    }

    #[test]
    fn test_location_requires_every_wanted_location() {
        let data = vec![
            with_venues(entity(1, "A", 1990, "01-01-1991", &["x"]), &["paris-france", "london-uk"]),
            with_venues(entity(2, "B", 1990, "01-01-1991", &["x"]), &["paris-france"]),
        ];
        let filters = Filters {
            locations: vec!["france".to_string(), "  LONDON ".to_string()],
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1]);
    }

    #[test]
    fn test_location_matches_rules() {
        assert!(location_matches("paris-france", "Paris, France"));
        assert!(location_matches(" Paris-France ", "paris"));
        assert!(!location_matches("paris-france", "paris, usa"));
        assert!(!location_matches("paris-france", "paris, ile-de-france, france"));
        assert!(location_matches("north_carolina-usa", "carolina, usa"));
    }

    #[test]
    fn test_search_by_name_includes_members() {
        let data = test_utils::merged_artists();
        let filters = Filters {
            search_query: "ROGER".to_string(),
            search_type: SearchType::Name,
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1, 2]);
    }

    #[test]
    fn test_search_other_type_matches_name_only() {
        let data = test_utils::merged_artists();
        let filters = Filters {
            search_query: "roger".to_string(),
            search_type: SearchType::Other,
            ..Filters::unbounded()
        };
        assert!(apply_filters(&data, &filters).is_empty());

        let filters = Filters {
            search_query: "floyd".to_string(),
            ..filters
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2]);
    }

    #[test]
    fn test_search_by_location_and_date() {
        let data = test_utils::merged_artists();

        let filters = Filters {
            search_query: "los_angeles".to_string(),
            search_type: SearchType::Location,
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2]);

        let filters = Filters {
            search_query: "07-1986".to_string(),
            search_type: SearchType::Date,
            ..Filters::unbounded()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1]);
    }

    #[test]
    fn test_search_general_fields() {
        let data = test_utils::merged_artists();
        let general = |query: &str| Filters {
            search_query: query.to_string(),
            search_type: SearchType::General,
            ..Filters::unbounded()
        };

        assert_eq!(ids(&apply_filters(&data, &general("1996"))), vec![3]);
        assert_eq!(ids(&apply_filters(&data, &general("05-08"))), vec![2]);
        assert_eq!(ids(&apply_filters(&data, &general("london"))), vec![1]);
        assert_eq!(ids(&apply_filters(&data, &general("marshall"))), vec![3]);
        assert!(apply_filters(&data, &general("no such band")).is_empty());
    }

    #[test]
    fn test_apply_filters_idempotent() {
        let data = test_utils::merged_artists();
        let filters = Filters {
            search_query: "o".to_string(),
            search_type: SearchType::General,
            creation_min: 1960,
            creation_max: 1980,
            band_members: vec!["3".to_string(), "4".to_string()],
            ..Filters::unbounded()
        };

        let once: Vec<MergedArtist> = apply_filters(&data, &filters).into_iter().cloned().collect();
        let twice: Vec<MergedArtist> = apply_filters(&once, &filters).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_parse_filters() {
        let pairs: Vec<(String, String)> = [
            ("search", "queen"),
            ("searchType", "name"),
            ("creationMin", "1960"),
            ("creationMax", "not-a-year"),
            ("bandMembers", "4"),
            ("bandMembers", "5"),
            ("bandMembers", ""),
            ("locations", "Paris, France"),
            ("locations", "texas"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let defaults = FilterDefaults::default();
        let filters = parse_filters(&pairs, &defaults);

        assert_eq!(filters.search_query, "queen");
        assert_eq!(filters.search_type, SearchType::Name);
        assert_eq!(filters.creation_min, 1960);
        assert_eq!(filters.creation_max, defaults.creation_max);
        assert_eq!(filters.album_min, defaults.album_min);
        assert_eq!(filters.album_max, defaults.album_max);
        assert_eq!(filters.band_members, vec!["4", "5"]);
        assert_eq!(filters.locations, vec!["Paris, France", "texas"]);
    }

    #[test]
    fn test_parse_filters_empty_keeps_fixtures() {
        let filters = parse_filters(&[], &FilterDefaults::default());
        assert_eq!(filters.search_type, SearchType::Other);

        let data = test_utils::merged_artists();
        assert_eq!(apply_filters(&data, &filters).len(), data.len());
    }
}
