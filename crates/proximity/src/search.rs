use model::{Candidate, Distance, GeoPoint};
use thiserror::Error;
use utility::{geo::GeoError, id::Id};

use crate::{
    config::ProximityConfig,
    store::{CandidateStore, StoreError},
};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error("candidate store failed: {0}")]
    Store(#[from] StoreError),
    #[error("there is no user with id {0}")]
    SubjectNotFound(i64),
}

pub type SearchResult<T> = Result<T, SearchError>;

/// Runs proximity searches against a [`CandidateStore`].
pub struct NearbySearch<S> {
    store: S,
    config: ProximityConfig,
}

impl<S> NearbySearch<S>
where
    S: CandidateStore + Send,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, ProximityConfig::default())
    }

    pub fn with_config(store: S, config: ProximityConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Ids of all candidates inside the bounding box of `distance` around
    /// `point`.
    pub async fn find_nearby(
        &mut self,
        point: GeoPoint,
        distance: Distance,
    ) -> SearchResult<Vec<Id<Candidate>>> {
        let bounding_box = self.config.calculator().compute(
            point.latitude(),
            point.longitude(),
            distance.miles(),
        )?;
        let ids = self
            .store
            .ids_within(&bounding_box, self.config.antimeridian)
            .await?;
        log::debug!(
            "{} candidates within {} miles of ({}, {})",
            ids.len(),
            distance.miles(),
            point.latitude(),
            point.longitude()
        );
        Ok(ids)
    }

    /// Ids of the candidates around a stored user. The user itself is part
    /// of the result. Without a distance the configured default is used.
    pub async fn recommend(
        &mut self,
        subject: &Id<Candidate>,
        distance: Option<Distance>,
    ) -> SearchResult<Vec<Id<Candidate>>> {
        let point = self
            .store
            .location_of(subject)
            .await?
            .ok_or_else(|| SearchError::SubjectNotFound(subject.raw()))?;
        let distance = distance.unwrap_or(self.config.default_distance);
        self.find_nearby(point, distance).await
    }
}
