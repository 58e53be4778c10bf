//! Shard addressing throughput benchmark
//!
//! Run with: cargo bench --bench hash_bench

use std::time::Instant;

use shardloc::{group_by_shard, hash64, par_group_by_shard, ShardingSpec};

const NUM_HASHES: usize = 10_000_000;
const NUM_LABELS: usize = 2_000_000;

fn main() {
    println!("{}", "=".repeat(60));
    println!("shardloc benchmark");
    println!("{}", "=".repeat(60));

    // Hash throughput
    println!("\n--- HASH BENCHMARK ---");
    let start = Instant::now();
    let mut acc = 0u64;
    for i in 0..NUM_HASHES as u64 {
        acc = acc.wrapping_add(hash64(i, 0));
    }
    let duration = start.elapsed();
    println!("Hashed {} labels in {:?} (acc {:x})", NUM_HASHES, duration, acc);
    println!(
        "Hash rate: {:.0} hashes/sec",
        NUM_HASHES as f64 / duration.as_secs_f64()
    );

    // Grouping throughput, sequential vs parallel
    let spec = ShardingSpec::new(9, 15, 6);
    let labels: Vec<u64> = (0..NUM_LABELS as u64).map(|i| i.wrapping_mul(0x9e3779b9)).collect();

    println!("\n--- GROUPING BENCHMARK ---");
    let start = Instant::now();
    let groups = group_by_shard(&labels, &spec);
    let seq = start.elapsed();
    println!(
        "Sequential: {} labels -> {} shards in {:?} ({:.0} labels/sec)",
        NUM_LABELS,
        groups.len(),
        seq,
        NUM_LABELS as f64 / seq.as_secs_f64()
    );

    let start = Instant::now();
    let groups = par_group_by_shard(&labels, &spec);
    let par = start.elapsed();
    println!(
        "Parallel:   {} labels -> {} shards in {:?} ({:.0} labels/sec)",
        NUM_LABELS,
        groups.len(),
        par,
        NUM_LABELS as f64 / par.as_secs_f64()
    );
    println!(
        "Speedup: {:.2}x",
        seq.as_secs_f64() / par.as_secs_f64()
    );
}
