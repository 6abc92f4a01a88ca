use model::{Candidate, GeoPoint};
use proximity::{StoreError, StoreResult};
use sqlx::{Executor, Postgres, QueryBuilder};
use utility::{
    geo::{AntimeridianPolicy, BoundingBox},
    id::Id,
};

use crate::data_model::candidate::{CandidateIdRow, CandidateRow};

use super::convert_error;

pub async fn location_of<'c, E>(
    executor: E,
    id: &Id<Candidate>,
) -> StoreResult<Option<GeoPoint>>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<CandidateRow> = sqlx::query_as(
        "
        SELECT
            id, latitude, longitude
        FROM
            users
        WHERE
            id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?;

    row.map(|row| GeoPoint::new(row.latitude, row.longitude))
        .transpose()
        .map_err(StoreError::from)
}

/// The values bound into [`within_box_query`], in placeholder order: the
/// latitude range, then each longitude range, each as `min, max`.
pub fn within_box_arguments(
    bounding_box: &BoundingBox,
    antimeridian: AntimeridianPolicy,
) -> Vec<f64> {
    let mut arguments = vec![bounding_box.latitude.min, bounding_box.latitude.max];
    for range in bounding_box.longitude_ranges(antimeridian) {
        arguments.push(range.min);
        arguments.push(range.max);
    }
    arguments
}

/// Builds the range query selecting every user inside `bounding_box`.
///
/// Bounds are inclusive on both axes, the same as the in-memory filter. A
/// wrapped longitude range becomes two `BETWEEN` clauses under
/// [`AntimeridianPolicy::Split`].
pub fn within_box_query<'args>(
    bounding_box: &BoundingBox,
    antimeridian: AntimeridianPolicy,
) -> QueryBuilder<'args, Postgres> {
    let arguments = within_box_arguments(bounding_box, antimeridian);
    let mut query = QueryBuilder::new("SELECT id FROM users WHERE ");
    for (i, range) in arguments.chunks_exact(2).enumerate() {
        query.push(match i {
            0 => "latitude BETWEEN ",
            1 => " AND (longitude BETWEEN ",
            _ => " OR longitude BETWEEN ",
        });
        query.push_bind(range[0]).push(" AND ").push_bind(range[1]);
    }
    query.push(") ORDER BY id;");
    query
}

pub async fn ids_within<'c, E>(
    executor: E,
    bounding_box: &BoundingBox,
    antimeridian: AntimeridianPolicy,
) -> StoreResult<Vec<Id<Candidate>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut query = within_box_query(bounding_box, antimeridian);
    let rows: Vec<CandidateIdRow> = query
        .build_query_as()
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    log::debug!("{} users within {:?}", rows.len(), bounding_box);
    Ok(rows.into_iter().map(|row| Id::new(row.id)).collect())
}

#[cfg(test)]
mod tests {
    use proximity::{filter_within_box, ProximityFilter};
    use utility::{
        geo::{compute_bounding_box, Range},
        id::IdWrapper as _,
    };

    use super::*;

    #[test]
    fn range_query_is_inclusive_on_both_axes() {
        let bounding_box = compute_bounding_box(19.450928, -70.694751, 30.0).unwrap();
        let query = within_box_query(&bounding_box, AntimeridianPolicy::Legacy);
        assert_eq!(
            query.sql(),
            "SELECT id FROM users WHERE latitude BETWEEN $1 AND $2 \
             AND (longitude BETWEEN $3 AND $4) ORDER BY id;"
        );
    }

    #[test]
    fn wrapped_box_keeps_single_range_under_legacy_policy() {
        let bounding_box =
            BoundingBox::new(Range::new(-1.0, 1.0), Range::new(179.5, -179.5));
        let query = within_box_query(&bounding_box, AntimeridianPolicy::Legacy);
        assert_eq!(
            query.sql(),
            "SELECT id FROM users WHERE latitude BETWEEN $1 AND $2 \
             AND (longitude BETWEEN $3 AND $4) ORDER BY id;"
        );
    }

    #[test]
    fn wrapped_box_is_split_under_split_policy() {
        let bounding_box =
            BoundingBox::new(Range::new(-1.0, 1.0), Range::new(179.5, -179.5));
        let query = within_box_query(&bounding_box, AntimeridianPolicy::Split);
        assert_eq!(
            query.sql(),
            "SELECT id FROM users WHERE latitude BETWEEN $1 AND $2 \
             AND (longitude BETWEEN $3 AND $4 OR longitude BETWEEN $5 AND $6) \
             ORDER BY id;"
        );
    }

    #[test]
    fn arguments_follow_placeholder_order() {
        let bounding_box = compute_bounding_box(19.450928, -70.694751, 30.0).unwrap();
        assert_eq!(
            within_box_arguments(&bounding_box, AntimeridianPolicy::Legacy),
            vec![
                bounding_box.latitude.min,
                bounding_box.latitude.max,
                bounding_box.longitude.min,
                bounding_box.longitude.max,
            ]
        );
    }

    #[test]
    fn wrapped_box_arguments_per_policy() {
        let bounding_box =
            BoundingBox::new(Range::new(-1.0, 1.0), Range::new(179.5, -179.5));
        assert_eq!(
            within_box_arguments(&bounding_box, AntimeridianPolicy::Legacy),
            vec![-1.0, 1.0, 179.5, -179.5]
        );
        assert_eq!(
            within_box_arguments(&bounding_box, AntimeridianPolicy::Split),
            vec![-1.0, 1.0, 179.5, 180.0, -180.0, -179.5]
        );
    }

    /// Evaluates the generated predicate the way PostgreSQL does, with
    /// `x BETWEEN a AND b` meaning `a <= x AND x <= b`.
    fn predicate_matches(arguments: &[f64], candidate: &Candidate) -> bool {
        let between = |x: f64, range: &[f64]| range[0] <= x && x <= range[1];
        let mut ranges = arguments.chunks_exact(2);
        let latitude = ranges.next().unwrap();
        between(candidate.latitude, latitude)
            && ranges.any(|longitude| between(candidate.longitude, longitude))
    }

    fn predicate_ids(
        bounding_box: &BoundingBox,
        antimeridian: AntimeridianPolicy,
        candidates: &[Candidate],
    ) -> Vec<Id<Candidate>> {
        let arguments = within_box_arguments(bounding_box, antimeridian);
        candidates
            .iter()
            .filter(|candidate| predicate_matches(&arguments, candidate))
            .map(|candidate| candidate.id)
            .collect()
    }

    #[test]
    fn predicate_selects_what_the_filter_selects() {
        let bounding_box = compute_bounding_box(19.450928, -70.694751, 30.0).unwrap();
        let candidates = vec![
            Candidate::new(1, 19.450928, -70.694751),
            Candidate::new(2, bounding_box.latitude.min, -70.694751),
            Candidate::new(3, 19.450928, bounding_box.longitude.max),
            Candidate::new(4, bounding_box.latitude.max + 1e-9, -70.694751),
            Candidate::new(5, 18.4861, -69.9312),
        ];
        for antimeridian in [AntimeridianPolicy::Legacy, AntimeridianPolicy::Split] {
            let filtered = ProximityFilter::new(antimeridian)
                .filter_within_box(&bounding_box, &candidates)
                .unwrap();
            assert_eq!(
                predicate_ids(&bounding_box, antimeridian, &candidates),
                filtered
            );
            assert_eq!(filtered.raw(), vec![1, 2, 3]);
        }
    }

    #[test]
    fn wrapped_predicate_selects_what_the_filter_selects() {
        let bounding_box =
            BoundingBox::new(Range::new(-1.0, 1.0), Range::new(179.5, -179.5));
        let candidates = vec![
            Candidate::new(1, 0.0, 179.8),
            Candidate::new(2, 0.0, -179.8),
            Candidate::new(3, 0.0, 0.0),
        ];

        let legacy = predicate_ids(&bounding_box, AntimeridianPolicy::Legacy, &candidates);
        assert_eq!(
            legacy,
            filter_within_box(&bounding_box, &candidates).unwrap()
        );
        assert!(legacy.is_empty());

        let split = predicate_ids(&bounding_box, AntimeridianPolicy::Split, &candidates);
        assert_eq!(
            split,
            ProximityFilter::new(AntimeridianPolicy::Split)
                .filter_within_box(&bounding_box, &candidates)
                .unwrap()
        );
        assert_eq!(split.raw(), vec![1, 2]);
    }
}
