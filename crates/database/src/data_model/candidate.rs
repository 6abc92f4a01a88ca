use async_trait::async_trait;
use model::{Candidate, GeoPoint};
use proximity::{CandidateStore, StoreResult};
use sqlx::prelude::FromRow;
use utility::{
    geo::{AntimeridianPolicy, BoundingBox},
    id::Id,
};

use crate::{
    queries::candidate::{ids_within, location_of},
    PgDatabaseAutocommit, PgDatabaseTransaction,
};

/// Table: users
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CandidateIdRow {
    pub id: i64,
}

// Store

#[async_trait]
impl CandidateStore for PgDatabaseAutocommit {
    async fn location_of(&mut self, id: &Id<Candidate>) -> StoreResult<Option<GeoPoint>> {
        location_of(&self.pool, id).await
    }

    async fn ids_within(
        &mut self,
        bounding_box: &BoundingBox,
        antimeridian: AntimeridianPolicy,
    ) -> StoreResult<Vec<Id<Candidate>>> {
        ids_within(&self.pool, bounding_box, antimeridian).await
    }
}

#[async_trait]
impl<'a> CandidateStore for PgDatabaseTransaction<'a> {
    async fn location_of(&mut self, id: &Id<Candidate>) -> StoreResult<Option<GeoPoint>> {
        location_of(&mut *self.tx, id).await
    }

    async fn ids_within(
        &mut self,
        bounding_box: &BoundingBox,
        antimeridian: AntimeridianPolicy,
    ) -> StoreResult<Vec<Id<Candidate>>> {
        ids_within(&mut *self.tx, bounding_box, antimeridian).await
    }
}

#[cfg(test)]
mod tests {
    use proximity::ProximityFilter;
    use utility::geo::{compute_bounding_box, Range};

    use super::*;
    use crate::{DatabaseConnectionInfo, PgDatabase};

    /// Opens a transaction on the database named by the `DATABASE_*`
    /// variables and replaces the contents of `users` inside it. Dropping
    /// the transaction rolls everything back.
    async fn seeded(candidates: &[Candidate]) -> PgDatabaseTransaction<'static> {
        let info = DatabaseConnectionInfo::from_env().expect("DATABASE_* variables are set");
        let database = PgDatabase::connect(info).await.unwrap();
        let mut tx = database.transaction().await.unwrap();
        sqlx::query("DELETE FROM users;")
            .execute(&mut *tx.tx)
            .await
            .unwrap();
        for candidate in candidates {
            sqlx::query("INSERT INTO users (id, latitude, longitude) VALUES ($1, $2, $3);")
                .bind(candidate.id.raw())
                .bind(candidate.latitude)
                .bind(candidate.longitude)
                .execute(&mut *tx.tx)
                .await
                .unwrap();
        }
        tx
    }

    async fn assert_agrees_with_filter(
        tx: &mut PgDatabaseTransaction<'static>,
        bounding_box: &BoundingBox,
        antimeridian: AntimeridianPolicy,
        candidates: &[Candidate],
    ) -> Vec<i64> {
        let from_database = tx.ids_within(bounding_box, antimeridian).await.unwrap();
        let from_filter = ProximityFilter::new(antimeridian)
            .filter_within_box(bounding_box, candidates)
            .unwrap();
        assert_eq!(from_database, from_filter);
        from_database.into_iter().map(|id| id.raw()).collect()
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL database configured through DATABASE_*"]
    async fn range_query_includes_candidates_on_the_bounds() {
        let bounding_box = compute_bounding_box(19.450928, -70.694751, 30.0).unwrap();
        let candidates = vec![
            Candidate::new(1, 19.450928, -70.694751),
            Candidate::new(2, bounding_box.latitude.min, -70.694751),
            Candidate::new(3, 19.450928, bounding_box.longitude.max),
            Candidate::new(4, 18.4861, -69.9312),
        ];
        let mut tx = seeded(&candidates).await;

        let ids = assert_agrees_with_filter(
            &mut tx,
            &bounding_box,
            AntimeridianPolicy::Legacy,
            &candidates,
        )
        .await;
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            tx.location_of(&Id::new(2)).await.unwrap(),
            Some(GeoPoint::new(bounding_box.latitude.min, -70.694751).unwrap())
        );
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL database configured through DATABASE_*"]
    async fn range_query_handles_wrapped_boxes_per_policy() {
        let bounding_box =
            BoundingBox::new(Range::new(-1.0, 1.0), Range::new(179.5, -179.5));
        let candidates = vec![
            Candidate::new(1, 0.0, 179.8),
            Candidate::new(2, 0.0, -179.8),
            Candidate::new(3, 0.0, 0.0),
        ];
        let mut tx = seeded(&candidates).await;

        let legacy = assert_agrees_with_filter(
            &mut tx,
            &bounding_box,
            AntimeridianPolicy::Legacy,
            &candidates,
        )
        .await;
        assert!(legacy.is_empty());

        let split = assert_agrees_with_filter(
            &mut tx,
            &bounding_box,
            AntimeridianPolicy::Split,
            &candidates,
        )
        .await;
        assert_eq!(split, vec![1, 2]);
    }
}
