pub mod pool;
pub mod sweep;

pub use pool::WorkerPool;
pub use sweep::{sweep_catalog, SweepEntry};
