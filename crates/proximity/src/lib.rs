pub mod config;
pub mod filter;
pub mod search;
pub mod store;

pub use config::ProximityConfig;
pub use filter::{filter_within_box, ProximityFilter};
pub use search::{NearbySearch, SearchError, SearchResult};
pub use store::{CandidateStore, InMemoryStore, StoreError, StoreResult};

#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
