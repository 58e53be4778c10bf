//! Batch classification of label arrays.
//!
//! Every operation here is a loop over the scalar path in `locate`; the
//! `par_*` variants split the input into chunks, classify chunks on the
//! rayon pool, and merge the partial maps in chunk order so per-shard
//! label order comes out identical to the sequential path.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use crate::spec::ShardingSpec;

/// shard_number -> labels, in input order.
pub type ShardMap = HashMap<u64, Vec<u64>>;

/// shard_number -> minishard_number -> labels.
pub type MinishardMap = HashMap<u64, HashMap<u64, Vec<u64>>>;

/// Chunk size for the parallel variants. Each chunk is one hash-bound unit
/// of work; anything in the tens of thousands amortizes the map merges.
const PAR_CHUNK: usize = 16 * 1024;

/// Groups labels by their shard number, preserving relative input order
/// within each shard's list.
pub fn group_by_shard(labels: &[u64], spec: &ShardingSpec) -> ShardMap {
    let mut groups = ShardMap::new();
    group_chunk(labels, spec, &mut groups);
    debug!(
        labels = labels.len(),
        shards = groups.len(),
        "grouped labels by shard"
    );
    groups
}

/// Two-level grouping by shard then minishard. When `sort` is set, each
/// leaf list is sorted ascending for canonical downstream serialization;
/// otherwise insertion order is kept.
pub fn group_by_shard_and_minishard(
    labels: &[u64],
    spec: &ShardingSpec,
    sort: bool,
) -> MinishardMap {
    let mut groups = MinishardMap::new();
    group_chunk_two_level(labels, spec, &mut groups);
    if sort {
        sort_leaves(&mut groups);
    }
    debug!(
        labels = labels.len(),
        shards = groups.len(),
        sort,
        "grouped labels by shard and minishard"
    );
    groups
}

/// The set of shard numbers touched by a batch.
pub fn distinct_shard_numbers(labels: &[u64], spec: &ShardingSpec) -> HashSet<u64> {
    labels.iter().map(|&label| spec.shard_number(label)).collect()
}

/// Parallel [`group_by_shard`]; produces the identical map, including
/// within-shard order.
pub fn par_group_by_shard(labels: &[u64], spec: &ShardingSpec) -> ShardMap {
    let partials: Vec<ShardMap> = labels
        .par_chunks(PAR_CHUNK)
        .map(|chunk| {
            let mut partial = ShardMap::new();
            group_chunk(chunk, spec, &mut partial);
            partial
        })
        .collect();

    // par_chunks yields partials in input order, so appending them in
    // sequence keeps each shard's list stable.
    let mut groups = ShardMap::new();
    for partial in partials {
        for (shard, mut list) in partial {
            groups.entry(shard).or_default().append(&mut list);
        }
    }
    debug!(
        labels = labels.len(),
        shards = groups.len(),
        "grouped labels by shard (parallel)"
    );
    groups
}

/// Parallel [`group_by_shard_and_minishard`]. Unsorted leaf order matches
/// the sequential path for the same reason as [`par_group_by_shard`].
pub fn par_group_by_shard_and_minishard(
    labels: &[u64],
    spec: &ShardingSpec,
    sort: bool,
) -> MinishardMap {
    let partials: Vec<MinishardMap> = labels
        .par_chunks(PAR_CHUNK)
        .map(|chunk| {
            let mut partial = MinishardMap::new();
            group_chunk_two_level(chunk, spec, &mut partial);
            partial
        })
        .collect();

    let mut groups = MinishardMap::new();
    for partial in partials {
        for (shard, minishards) in partial {
            let target = groups.entry(shard).or_default();
            for (minishard, mut list) in minishards {
                target.entry(minishard).or_default().append(&mut list);
            }
        }
    }
    if sort {
        sort_leaves(&mut groups);
    }
    groups
}

/// Parallel [`distinct_shard_numbers`].
pub fn par_distinct_shard_numbers(labels: &[u64], spec: &ShardingSpec) -> HashSet<u64> {
    labels
        .par_chunks(PAR_CHUNK)
        .map(|chunk| distinct_shard_numbers(chunk, spec))
        .reduce(HashSet::new, |mut acc, partial| {
            acc.extend(partial);
            acc
        })
}

fn group_chunk(labels: &[u64], spec: &ShardingSpec, groups: &mut ShardMap) {
    for &label in labels {
        groups.entry(spec.shard_number(label)).or_default().push(label);
    }
}

fn group_chunk_two_level(labels: &[u64], spec: &ShardingSpec, groups: &mut MinishardMap) {
    for &label in labels {
        let loc = spec.locate(label);
        groups
            .entry(loc.shard_number)
            .or_default()
            .entry(loc.minishard_number)
            .or_default()
            .push(label);
    }
}

fn sort_leaves(groups: &mut MinishardMap) {
    for minishards in groups.values_mut() {
        for labels in minishards.values_mut() {
            labels.sort_unstable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_yields_empty_maps() {
        let spec = ShardingSpec::new(0, 8, 4);
        assert!(group_by_shard(&[], &spec).is_empty());
        assert!(group_by_shard_and_minishard(&[], &spec, true).is_empty());
        assert!(distinct_shard_numbers(&[], &spec).is_empty());
        assert!(par_group_by_shard(&[], &spec).is_empty());
    }

    #[test]
    fn zero_shard_bits_collapses_to_one_group() {
        let spec = ShardingSpec::new(0, 0, 4);
        let labels: Vec<u64> = (0..100).collect();
        let groups = group_by_shard(&labels, &spec);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&0], labels);
    }

    #[test]
    fn within_shard_order_is_input_order() {
        let spec = ShardingSpec::new(0, 2, 2);
        let labels: Vec<u64> = (0..1000).rev().collect();
        for list in group_by_shard(&labels, &spec).values() {
            // Input was descending, so every per-shard list must be too.
            assert!(list.windows(2).all(|w| w[0] > w[1]));
        }
    }

    #[test]
    fn sort_flag_orders_leaf_lists() {
        let spec = ShardingSpec::new(0, 3, 3);
        let labels: Vec<u64> = (0..1000).rev().collect();
        let groups = group_by_shard_and_minishard(&labels, &spec, true);
        for minishards in groups.values() {
            for list in minishards.values() {
                assert!(list.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
