///! Artist touring data module
///!
///! ## Main Components
///! - `GroupieApiClient`: HTTP source of the four upstream collections
///! - `fetch_and_join`: concurrent fetch + join by artist id
///! - `ArtistCache`: time-windowed snapshot shared by all requests
///! - `apply_filters` / `generate_suggestions`: pure functions over a snapshot

// ============ Errors ============
mod error;
pub use error::{DateParseError, FetchError, Resource};

// ============ Upstream ============
mod api_client;
pub use api_client::{
    ArtistSource, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECONDS, GroupieApiClient,
};

mod joiner;
pub use joiner::{fetch_and_join, join_records};

// ============ Cache ============
mod manager;
pub use manager::{ArtistCache, CachePolicy, DEFAULT_CACHE_TTL_SECONDS, SnapshotInfo};

// ============ Filtering and search ============
mod date;
pub use date::{extract_year, is_numeric};

mod filter;
pub use filter::{
    FilterDefaults, apply_filters, location_matches, matches_album_year, matches_band_members,
    matches_creation_year, matches_locations, matches_search, parse_filters,
};

mod suggest;
pub use suggest::generate_suggestions;
