pub mod evictor;
pub mod snapshot_cache;
pub mod store;
