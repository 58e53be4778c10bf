//! Scalar shard address derivation.

use crate::hash::hash64;
use crate::spec::{shr_saturating, ShardingSpec};

/// Where a label lives inside the sharded layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardLocation {
    /// Index of the shard file, drawn from bits
    /// `[minishard_bits, minishard_bits + shard_bits)` of the hash.
    pub shard_number: u64,
    /// Index of the bucket within the shard, drawn from the low
    /// `minishard_bits` of the hash.
    pub minishard_number: u64,
    /// The preshifted label: the value that was hashed and the value the
    /// minishard index records.
    pub chunk_id: u64,
}

impl ShardingSpec {
    /// Chunk id for a label: the label with the low `preshift_bits`
    /// dropped. A preshift of 64 or more maps every label to chunk 0.
    #[inline]
    pub fn chunk_id(&self, label: u64) -> u64 {
        shr_saturating(label, self.preshift_bits)
    }

    /// Full shard/minishard/chunk-id coordinates of a label.
    pub fn locate(&self, label: u64) -> ShardLocation {
        let chunk_id = self.chunk_id(label);
        let hashed = hash64(chunk_id, 0);
        ShardLocation {
            shard_number: shr_saturating(hashed & self.shard_mask(), self.minishard_bits),
            minishard_number: hashed & self.minishard_mask(),
            chunk_id,
        }
    }

    /// Shard file index for a label.
    pub fn shard_number(&self, label: u64) -> u64 {
        self.locate(label).shard_number
    }

    /// Minishard bucket index for a label.
    pub fn minishard_number(&self, label: u64) -> u64 {
        self.locate(label).minishard_number
    }

    /// Shard number as the zero-padded lowercase hex string used in shard
    /// filenames; width is one digit per started nibble of `shard_bits`.
    pub fn shard_label(&self, label: u64) -> String {
        let width = (usize::from(self.shard_bits) + 3) / 4;
        format!("{:0width$x}", self.shard_number(label))
    }
}
