//! Redis-backed adapters for multi-server deployments.

mod cache;

pub use cache::RedisCache;
