//! Lightweight worker demo.
//!
//! Spawns N workers doing dummy CPU work and aggregates their results over
//! a channel. Workers get the startup-configured stack size, and no more
//! than the configured parallelism cap run at once.

use anyhow::{Context, Result};
use std::thread;

use crate::startup;

fn worker_sum(id: u64, workload: u64) -> i64 {
    let mut sum = 0i64;
    for j in 0..workload {
        sum = sum.wrapping_add((j as i64).wrapping_mul(id as i64));
    }
    sum
}

/// Spawn `count` workers, each computing `sum(j * id for j in 0..workload)`,
/// and return the aggregated total.
pub fn spawn_workers(count: usize, workload: u64) -> Result<i64> {
    if count == 0 {
        return Ok(0);
    }

    let stack_size = startup::worker_stack_size();
    let max_parallel = startup::max_parallelism().max(1);

    let (tx, rx) = crossbeam_channel::bounded::<i64>(count);

    // Waves of at most max_parallel threads; ids are 1-based so every
    // worker contributes a distinct term.
    let mut next_id = 1usize;
    while next_id <= count {
        let wave_end = (next_id + max_parallel - 1).min(count);
        let mut handles = Vec::with_capacity(wave_end - next_id + 1);

        for id in next_id..=wave_end {
            let tx = tx.clone();
            let handle = thread::Builder::new()
                .name(format!("sigbridge-worker-{}", id))
                .stack_size(stack_size)
                .spawn(move || {
                    let _ = tx.send(worker_sum(id as u64, workload));
                })
                .with_context(|| format!("spawning worker {}", id))?;
            handles.push(handle);
        }

        for handle in handles {
            let _ = handle.join();
        }
        next_id = wave_end + 1;
    }
    drop(tx);

    let mut total = 0i64;
    while let Ok(sum) = rx.try_recv() {
        total = total.wrapping_add(sum);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_total(count: i64, workload: i64) -> i64 {
        // sum over id in 1..=count of id * sum(0..workload)
        let per_id = workload * (workload - 1) / 2;
        (count * (count + 1) / 2) * per_id
    }

    #[test]
    fn aggregate_matches_the_closed_form() {
        let total = spawn_workers(8, 1000).unwrap();
        assert_eq!(total, expected_total(8, 1000));
    }

    #[test]
    fn zero_workers_yield_zero() {
        assert_eq!(spawn_workers(0, 1000).unwrap(), 0);
    }

    #[test]
    fn zero_workload_yields_zero() {
        assert_eq!(spawn_workers(4, 0).unwrap(), 0);
    }

    #[test]
    fn more_workers_than_the_parallelism_cap() {
        // The cap only bounds concurrency, never the result.
        let total = spawn_workers(9, 10).unwrap();
        assert_eq!(total, expected_total(9, 10));
    }
}
