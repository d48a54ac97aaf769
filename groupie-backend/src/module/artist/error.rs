///! Error types for upstream fetching and date parsing
use std::fmt;
use thiserror::Error;

/// The four upstream collections joined into one artist view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Artists,
    Locations,
    Relations,
    Dates,
}

impl Resource {
    /// Path of the collection below the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Artists => "artists",
            Resource::Locations => "locations",
            Resource::Relations => "relation",
            Resource::Dates => "dates",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Artists => "artists",
            Resource::Locations => "locations",
            Resource::Relations => "relations",
            Resource::Dates => "dates",
        };
        write!(f, "{}", name)
    }
}

/// Failure of one upstream fetch. Fatal to the whole join.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {resource}: {source}")]
    Request {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {resource}: upstream returned HTTP {status}")]
    Status {
        resource: Resource,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode {resource} payload: {source}")]
    Decode {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Request { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::Decode { resource, .. } => *resource,
        }
    }
}

/// A first-album date that is not `DD-MM-YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("invalid date format: {0:?}")]
    Format(String),

    #[error("invalid year in date {date:?}: {source}")]
    Year {
        date: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
