pub mod types;

pub use types::{
    Artist, Dates, Filters, Location, MergedArtist, Relations, SearchType, Suggestion,
};
