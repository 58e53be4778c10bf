//! Sharding parameters for the uint64-sharded precomputed layout.
//!
//! `ShardingSpec` carries the three bit counts that drive address
//! derivation and knows how to parse itself out of the JSON `sharding`
//! block of a precomputed dataset. All mask and shift arithmetic is
//! defined for every bit count: zero-width fields yield zero masks and
//! shifts of 64 or more saturate to zero, so the derivation itself can
//! never fail. Validation errors exist only at the JSON boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `@type` string of the sharded precomputed format.
pub const SHARDING_TYPE: &str = "neuroglancer_uint64_sharded_v1";

/// The only hash the layout defines for uint64 labels.
pub const HASH_NAME: &str = "murmurhash3_x86_128";

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unsupported sharding type {0:?}, expected {SHARDING_TYPE:?}")]
    UnsupportedType(String),
    #[error("unsupported hash {0:?}, expected {HASH_NAME:?}")]
    UnsupportedHash(String),
    #[error("shard_bits ({shard_bits}) + minishard_bits ({minishard_bits}) exceeds the 64 hash bits")]
    FieldOverflow { shard_bits: u8, minishard_bits: u8 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Bit-field layout of a sharded dataset.
///
/// The low `minishard_bits` of the label hash select the minishard, the
/// next `shard_bits` select the shard file, and `preshift_bits` low bits
/// of the label are dropped before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpec", into = "RawSpec")]
pub struct ShardingSpec {
    pub preshift_bits: u8,
    pub shard_bits: u8,
    pub minishard_bits: u8,
}

impl ShardingSpec {
    /// Builds a spec without validation; out-of-range bit counts simply
    /// saturate during derivation.
    pub fn new(preshift_bits: u8, shard_bits: u8, minishard_bits: u8) -> Self {
        Self {
            preshift_bits,
            shard_bits,
            minishard_bits,
        }
    }

    /// Parses the JSON `sharding` block of a precomputed dataset.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let raw: RawSpec = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Serializes back to the JSON `sharding` block form.
    pub fn to_json(&self) -> String {
        // RawSpec serialization cannot fail: no maps, no non-string keys.
        serde_json::to_string(&RawSpec::from(*self)).unwrap_or_default()
    }

    /// Mask selecting the minishard field: the low `minishard_bits` of the
    /// hash.
    #[inline]
    pub fn minishard_mask(&self) -> u64 {
        low_bits(self.minishard_bits)
    }

    /// Mask selecting the shard field in place: bits
    /// `[minishard_bits, minishard_bits + shard_bits)` of the hash.
    #[inline]
    pub fn shard_mask(&self) -> u64 {
        let total = self.shard_bits.saturating_add(self.minishard_bits);
        low_bits(total) & !self.minishard_mask()
    }
}

/// Low `bits` bits set; all 64 set when `bits >= 64`, none when zero.
#[inline]
pub(crate) fn low_bits(bits: u8) -> u64 {
    match 1u64.checked_shl(u32::from(bits)) {
        Some(bit) => bit - 1,
        None => u64::MAX,
    }
}

/// `value >> shift` with shifts of 64 or more saturating to zero.
#[inline]
pub(crate) fn shr_saturating(value: u64, shift: u8) -> u64 {
    value.checked_shr(u32::from(shift)).unwrap_or(0)
}

/// On-disk JSON form, including the fixed `@type` and `hash` markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSpec {
    #[serde(rename = "@type")]
    type_name: String,
    hash: String,
    #[serde(default)]
    preshift_bits: u8,
    #[serde(default)]
    shard_bits: u8,
    #[serde(default)]
    minishard_bits: u8,
}

impl TryFrom<RawSpec> for ShardingSpec {
    type Error = SpecError;

    fn try_from(raw: RawSpec) -> Result<Self, Self::Error> {
        if raw.type_name != SHARDING_TYPE {
            return Err(SpecError::UnsupportedType(raw.type_name));
        }
        if raw.hash != HASH_NAME {
            return Err(SpecError::UnsupportedHash(raw.hash));
        }
        if raw.shard_bits.saturating_add(raw.minishard_bits) > 64 {
            return Err(SpecError::FieldOverflow {
                shard_bits: raw.shard_bits,
                minishard_bits: raw.minishard_bits,
            });
        }
        Ok(Self::new(raw.preshift_bits, raw.shard_bits, raw.minishard_bits))
    }
}

impl From<ShardingSpec> for RawSpec {
    fn from(spec: ShardingSpec) -> Self {
        Self {
            type_name: SHARDING_TYPE.to_string(),
            hash: HASH_NAME.to_string(),
            preshift_bits: spec.preshift_bits,
            shard_bits: spec.shard_bits,
            minishard_bits: spec.minishard_bits,
        }
    }
}
