// Pooled storage for captured parameters

mod cache;
mod parameters;
mod pool;
mod range_cache;

pub use cache::{ParameterCache, DEFAULT_CAPACITY};
pub use parameters::Parameters;
pub use pool::{BufferPool, ParameterPool, PoolStats, Rental, Reusable};
pub use range_cache::RangeParameterCache;
