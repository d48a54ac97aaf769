//! Fixtures, an in-memory [`ArtistSource`] and a stub upstream server for tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{Json, Router, http::StatusCode, routing::get};
use groupie_common::{Artist, Dates, Location, MergedArtist, Relations};
use serde_json::{Value, json};

use crate::module::artist::{ArtistSource, FetchError, Resource};

pub fn artists() -> Vec<Artist> {
    vec![
        Artist {
            id: 1,
            image: "https://example.test/images/queen.jpeg".to_string(),
            name: "Queen".to_string(),
            members: vec![
                "Freddie Mercury".to_string(),
                "Brian May".to_string(),
                "Roger Taylor".to_string(),
                "John Deacon".to_string(),
            ],
            creation_date: 1970,
            first_album: "14-12-1973".to_string(),
        },
        Artist {
            id: 2,
            image: "https://example.test/images/pinkfloyd.jpeg".to_string(),
            name: "Pink Floyd".to_string(),
            members: vec![
                "David Gilmour".to_string(),
                "Roger Waters".to_string(),
                "Nick Mason".to_string(),
            ],
            creation_date: 1965,
            first_album: "05-08-1967".to_string(),
        },
        Artist {
            id: 3,
            image: "https://example.test/images/eminem.jpeg".to_string(),
            name: "Eminem".to_string(),
            members: vec!["Marshall Mathers".to_string()],
            creation_date: 1996,
            first_album: "12-11-1996".to_string(),
        },
    ]
}

pub fn locations() -> Vec<Location> {
    vec![
        Location {
            id: 1,
            locations: vec!["paris-france".to_string(), "london-uk".to_string()],
        },
        Location {
            id: 2,
            locations: vec!["los_angeles-usa".to_string()],
        },
    ]
}

pub fn relations() -> Vec<Relations> {
    let mut queen = BTreeMap::new();
    queen.insert("paris-france".to_string(), vec!["13-05-1986".to_string()]);
    queen.insert("london-uk".to_string(), vec!["12-07-1986".to_string(), "11-07-1986".to_string()]);

    let mut floyd = BTreeMap::new();
    floyd.insert("los_angeles-usa".to_string(), vec!["18-04-1994".to_string()]);

    vec![
        Relations { id: 1, dates_locations: queen },
        Relations { id: 2, dates_locations: floyd },
    ]
}

pub fn dates() -> Vec<Dates> {
    vec![
        Dates {
            id: 1,
            dates: vec!["*13-05-1986".to_string(), "*12-07-1986".to_string(), "11-07-1986".to_string()],
        },
        Dates {
            id: 2,
            dates: vec!["*18-04-1994".to_string()],
        },
    ]
}

/// The fixture collections joined by hand
pub fn merged_artists() -> Vec<MergedArtist> {
    let locations = locations();
    let relations = relations();
    let dates = dates();

    artists()
        .into_iter()
        .map(|artist| {
            let id = artist.id;
            MergedArtist {
                artist,
                location: locations.iter().find(|l| l.id == id).cloned().unwrap_or_default(),
                relations: relations.iter().find(|r| r.id == id).cloned().unwrap_or_default(),
                dates: dates.iter().find(|d| d.id == id).cloned().unwrap_or_default(),
            }
        })
        .collect()
}

fn index_payload<T: serde::Serialize>(records: Vec<T>) -> Value {
    json!({ "index": records })
}

/// Router serving the fixtures under `/api/*` in the upstream wire format
pub fn upstream_router() -> Router {
    Router::new()
        .route("/api/artists", get(|| async { Json(json!(artists())) }))
        .route("/api/locations", get(|| async { Json(index_payload(locations())) }))
        .route("/api/relation", get(|| async { Json(index_payload(relations())) }))
        .route("/api/dates", get(|| async { Json(index_payload(dates())) }))
}

/// Serve `router` on an ephemeral local port and return its `/api` base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// In-memory source with call counting, injectable failures and latency
pub struct MockSource {
    artists: Vec<Artist>,
    locations: Vec<Location>,
    relations: Vec<Relations>,
    dates: Vec<Dates>,
    failing: Mutex<HashSet<Resource>>,
    delay: Option<Duration>,
    artist_fetches: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::with_records(artists(), locations(), relations(), dates())
    }

    pub fn with_records(
        artists: Vec<Artist>,
        locations: Vec<Location>,
        relations: Vec<Relations>,
        dates: Vec<Dates>,
    ) -> Self {
        Self {
            artists,
            locations,
            relations,
            dates,
            failing: Mutex::new(HashSet::new()),
            delay: None,
            artist_fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, resources: &[Resource]) {
        let mut failing = self.failing.lock().unwrap();
        failing.clear();
        failing.extend(resources.iter().copied());
    }

    /// Number of completed-or-attempted artist fetches, i.e. refresh count
    pub fn fetch_count(&self) -> usize {
        self.artist_fetches.load(Ordering::SeqCst)
    }

    async fn respond<T: Clone>(&self, resource: Resource, records: &[T]) -> Result<Vec<T>, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&resource) {
            return Err(FetchError::Status {
                resource,
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(records.to_vec())
    }
}

#[async_trait]
impl ArtistSource for MockSource {
    async fn fetch_artists(&self) -> Result<Vec<Artist>, FetchError> {
        self.artist_fetches.fetch_add(1, Ordering::SeqCst);
        self.respond(Resource::Artists, &self.artists).await
    }

    async fn fetch_locations(&self) -> Result<Vec<Location>, FetchError> {
        self.respond(Resource::Locations, &self.locations).await
    }

    async fn fetch_relations(&self) -> Result<Vec<Relations>, FetchError> {
        self.respond(Resource::Relations, &self.relations).await
    }

    async fn fetch_dates(&self) -> Result<Vec<Dates>, FetchError> {
        self.respond(Resource::Dates, &self.dates).await
    }
}
