///! Record joiner
///!
///! Fetches artists, locations, relations and dates concurrently and joins
///! them into one `MergedArtist` per artist id.
use groupie_common::{Artist, Dates, Location, MergedArtist, Relations};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::api_client::ArtistSource;
use super::error::{FetchError, Resource};

/// Fetch all four collections in parallel and join them.
///
/// All four fetches are awaited. If any failed the join fails as a whole; when
/// several failed, the error reported is the first in the order
/// artists, locations, relations, dates.
pub async fn fetch_and_join(source: &dyn ArtistSource) -> Result<Vec<MergedArtist>, FetchError> {
    let started = Instant::now();

    let (artists, locations, relations, dates) = tokio::join!(
        source.fetch_artists(),
        source.fetch_locations(),
        source.fetch_relations(),
        source.fetch_dates(),
    );

    for err in [
        artists.as_ref().err(),
        locations.as_ref().err(),
        relations.as_ref().err(),
        dates.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        error!("Upstream fetch failed: {}", err);
    }

    let artists = artists?;
    let locations = locations?;
    let relations = relations?;
    let dates = dates?;

    debug!(
        "Fetched {} artists, {} locations, {} relations, {} dates",
        artists.len(),
        locations.len(),
        relations.len(),
        dates.len()
    );

    let merged = join_records(artists, locations, relations, dates);

    info!("Joined {} artists in {:?}", merged.len(), started.elapsed());
    Ok(merged)
}

/// Join the collections by artist id, keeping the artist order.
///
/// Artists without a matching location/relations/dates record get the zero
/// value of that record. Duplicate ids inside one collection resolve
/// last-write-wins; a duplicated artist keeps the position of its first
/// occurrence.
pub fn join_records(
    artists: Vec<Artist>,
    locations: Vec<Location>,
    relations: Vec<Relations>,
    dates: Vec<Dates>,
) -> Vec<MergedArtist> {
    let artists = dedup_artists(artists);
    let mut locations = index_by_id(Resource::Locations, locations, |l| l.id);
    let mut relations = index_by_id(Resource::Relations, relations, |r| r.id);
    let mut dates = index_by_id(Resource::Dates, dates, |d| d.id);

    let merged: Vec<MergedArtist> = artists
        .into_iter()
        .map(|artist| {
            let id = artist.id;
            MergedArtist {
                artist,
                location: locations.remove(&id).unwrap_or_default(),
                relations: relations.remove(&id).unwrap_or_default(),
                dates: dates.remove(&id).unwrap_or_default(),
            }
        })
        .collect();

    let orphans = locations.len() + relations.len() + dates.len();
    if orphans > 0 {
        debug!("Ignored {} records without a matching artist", orphans);
    }

    merged
}

fn dedup_artists(artists: Vec<Artist>) -> Vec<Artist> {
    let mut positions: HashMap<u32, usize> = HashMap::with_capacity(artists.len());
    let mut ordered: Vec<Artist> = Vec::with_capacity(artists.len());

    for artist in artists {
        match positions.get(&artist.id) {
            Some(&index) => {
                warn!("Duplicate {} record for id {}, keeping the last one", Resource::Artists, artist.id);
                ordered[index] = artist;
            }
            None => {
                positions.insert(artist.id, ordered.len());
                ordered.push(artist);
            }
        }
    }

    ordered
}

fn index_by_id<T>(resource: Resource, records: Vec<T>, id_of: impl Fn(&T) -> u32) -> HashMap<u32, T> {
    let mut index = HashMap::with_capacity(records.len());

    for record in records {
        let id = id_of(&record);
        if index.insert(id, record).is_some() {
            warn!("Duplicate {} record for id {}, keeping the last one", resource, id);
        }
    }

    index
}
