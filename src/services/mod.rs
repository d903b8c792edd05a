// Service exports
pub mod cache;
pub mod location;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use location::{LocationClient, LocationError};
pub use postgres::{MarkerStore, StoreError};
