//! Shard address computation for uint64-sharded storage
//!
//! Computes which shard file and which minishard bucket a 64-bit label
//! belongs to under the Neuroglancer Precomputed
//! `neuroglancer_uint64_sharded_v1` layout:
//! - `hash`: bit-exact MurmurHash3 x86 128-bit engine for 8-byte inputs
//! - `spec`: sharding parameters, their bit masks, and JSON wire form
//! - `locate`: scalar shard/minishard derivation for a single label
//! - `batch`: sequential and parallel grouping over label arrays
//!
//! Only address computation is covered here. Reading and writing the shard
//! files themselves (index layout, compression) belongs to the storage
//! layer consuming these coordinates.

pub mod batch;
pub mod hash;
pub mod locate;
pub mod spec;

pub use batch::{
    distinct_shard_numbers, group_by_shard, group_by_shard_and_minishard,
    par_distinct_shard_numbers, par_group_by_shard, par_group_by_shard_and_minishard, MinishardMap,
    ShardMap,
};
pub use hash::{hash128, hash64};
pub use locate::ShardLocation;
pub use spec::{ShardingSpec, SpecError};
