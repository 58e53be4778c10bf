//! Non-cryptographic hashing for shard addressing.
//!
//! Re-exports the MurmurHash3 engine.

pub mod murmur3;

pub use murmur3::{hash128, hash64};
