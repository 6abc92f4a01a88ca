pub mod bounds;
pub mod candidate;
pub mod location;

pub use bounds::{AsBoundingBox, BoxBounds, RangeBounds};
pub use candidate::Candidate;
pub use location::{Distance, GeoPoint};
pub use utility::geo::{BoundingBox, GeoError, Range};
pub use utility::id::Id;
