use model::{AsBoundingBox, Candidate};
use utility::{
    geo::{AntimeridianPolicy, GeoError},
    id::Id,
};

/// Selects the candidates whose coordinates fall inside a bounding box.
///
/// Both axes are tested independently against closed intervals, so a
/// candidate sitting exactly on a bound is included. The result keeps the
/// order in which the candidates were passed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProximityFilter {
    pub antimeridian: AntimeridianPolicy,
}

impl ProximityFilter {
    pub fn new(antimeridian: AntimeridianPolicy) -> Self {
        Self { antimeridian }
    }

    pub fn filter_within_box<'a, B, I>(
        &self,
        bounds: &B,
        candidates: I,
    ) -> Result<Vec<Id<Candidate>>, GeoError>
    where
        B: AsBoundingBox + ?Sized,
        I: IntoIterator<Item = &'a Candidate>,
    {
        let bounding_box = bounds.as_bounding_box()?;

        let mut scanned = 0usize;
        let ids = candidates
            .into_iter()
            .inspect(|_| scanned += 1)
            .filter(|candidate| {
                bounding_box.contains(
                    candidate.latitude,
                    candidate.longitude,
                    self.antimeridian,
                )
            })
            .map(|candidate| candidate.id)
            .collect::<Vec<_>>();

        log::debug!(
            "{} of {} candidates within {:?}",
            ids.len(),
            scanned,
            bounding_box
        );
        Ok(ids)
    }
}

/// [`ProximityFilter::filter_within_box`] with the legacy antimeridian
/// handling.
pub fn filter_within_box<'a, B, I>(
    bounds: &B,
    candidates: I,
) -> Result<Vec<Id<Candidate>>, GeoError>
where
    B: AsBoundingBox + ?Sized,
    I: IntoIterator<Item = &'a Candidate>,
{
    ProximityFilter::default().filter_within_box(bounds, candidates)
}
