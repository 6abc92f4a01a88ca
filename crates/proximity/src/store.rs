use std::{error, result};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{Candidate, GeoPoint};
use utility::{
    geo::{AntimeridianPolicy, BoundingBox, GeoError},
    id::Id,
};

use crate::filter::ProximityFilter;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("invalid input: {0}")]
    InvalidInput(#[from] GeoError),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type StoreResult<T> = result::Result<T, StoreError>;

/// Somewhere candidate coordinates are kept.
///
/// `ids_within` must select exactly what [`ProximityFilter`] would select
/// for the same box and policy, in a stable order.
#[async_trait]
pub trait CandidateStore {
    /// The stored position of a candidate, `None` if there is no such
    /// candidate.
    async fn location_of(&mut self, id: &Id<Candidate>) -> StoreResult<Option<GeoPoint>>;

    async fn ids_within(
        &mut self,
        bounding_box: &BoundingBox,
        antimeridian: AntimeridianPolicy,
    ) -> StoreResult<Vec<Id<Candidate>>>;
}

/// Candidates held in memory, scanned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    candidates: IndexMap<Id<Candidate>, Candidate>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate or replaces the one with the same id. A replaced
    /// candidate keeps its position.
    pub fn insert(&mut self, candidate: Candidate) -> Option<Candidate> {
        self.candidates.insert(candidate.id, candidate)
    }

    pub fn remove(&mut self, id: &Id<Candidate>) -> Option<Candidate> {
        self.candidates.shift_remove(id)
    }

    pub fn get(&self, id: &Id<Candidate>) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl FromIterator<Candidate> for InMemoryStore {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        let mut store = Self::new();
        for candidate in iter {
            store.insert(candidate);
        }
        store
    }
}

#[async_trait]
impl CandidateStore for InMemoryStore {
    async fn location_of(&mut self, id: &Id<Candidate>) -> StoreResult<Option<GeoPoint>> {
        match self.candidates.get(id) {
            Some(candidate) => {
                GeoPoint::new(candidate.latitude, candidate.longitude)
                    .map(Some)
                    .map_err(StoreError::from)
            }
            None => Ok(None),
        }
    }

    async fn ids_within(
        &mut self,
        bounding_box: &BoundingBox,
        antimeridian: AntimeridianPolicy,
    ) -> StoreResult<Vec<Id<Candidate>>> {
        ProximityFilter::new(antimeridian)
            .filter_within_box(bounding_box, self.candidates.values())
            .map_err(StoreError::from)
    }
}
