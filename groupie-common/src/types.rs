use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Artist record as served by the upstream `/artists` endpoint.
///
/// Link fields (`locations`, `concertDates`, `relations`) are ignored; the
/// joined data replaces them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: u32,
    #[serde(default)]
    pub image: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub creation_date: i32,
    /// `DD-MM-YYYY`
    pub first_album: String,
}

/// Performance locations of one artist (`/locations` index entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Location → concert dates mapping of one artist (`/relation` index entry).
///
/// Kept in a `BTreeMap` so iteration is in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relations {
    pub id: u32,
    #[serde(default)]
    pub dates_locations: BTreeMap<String, Vec<String>>,
}

/// Concert dates of one artist (`/dates` index entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dates {
    pub id: u32,
    #[serde(default)]
    pub dates: Vec<String>,
}

/// One artist joined with its location, relations and dates records.
///
/// Missing records are represented by their zero value, never by an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedArtist {
    pub artist: Artist,
    pub location: Location,
    pub relations: Relations,
    pub dates: Dates,
}

impl MergedArtist {
    pub fn id(&self) -> u32 {
        self.artist.id
    }

    pub fn member_count(&self) -> usize {
        self.artist.members.len()
    }

    /// Location keys of the relations mapping, in sorted order
    pub fn performance_locations(&self) -> impl Iterator<Item = &str> {
        self.relations.dates_locations.keys().map(String::as_str)
    }

    /// Every concert date of the relations mapping, grouped by location
    pub fn relation_dates(&self) -> impl Iterator<Item = &str> {
        self.relations
            .dates_locations
            .values()
            .flat_map(|dates| dates.iter().map(String::as_str))
    }
}

/// Search-type selector shared by filtering and autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchType {
    Name,
    Location,
    Date,
    General,
    /// Any unrecognized selector, including an empty one. Matches artist names only.
    #[default]
    Other,
}

impl SearchType {
    /// Exact, case-sensitive match on the selector values the pages send
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => SearchType::Name,
            "location" => SearchType::Location,
            "date" => SearchType::Date,
            "general" => SearchType::General,
            _ => SearchType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Name => "name",
            SearchType::Location => "location",
            SearchType::Date => "date",
            SearchType::General => "general",
            SearchType::Other => "other",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query parameters of the artist listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub search_query: String,
    pub search_type: SearchType,
    pub creation_min: i32,
    pub creation_max: i32,
    pub album_min: i32,
    pub album_max: i32,
    /// Desired member counts as decimal strings, e.g. `"4"`
    pub band_members: Vec<String>,
    /// Desired performance locations, e.g. `"texas"` or `"Paris, France"`
    pub locations: Vec<String>,
}

impl Filters {
    /// Filters that keep every record: no query, no sets, year bounds wide open.
    pub fn unbounded() -> Self {
        Self {
            search_query: String::new(),
            search_type: SearchType::Other,
            creation_min: i32::MIN,
            creation_max: i32::MAX,
            album_min: i32::MIN,
            album_max: i32::MAX,
            band_members: Vec::new(),
            locations: Vec::new(),
        }
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// One autocomplete entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Formatted display value, `"<input> - <provenance>"`
    pub value: String,
    /// Raw matched text
    pub input: String,
}
