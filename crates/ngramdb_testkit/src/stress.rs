//! Concurrent lookup helpers.
//!
//! These helpers run the same queries against one model from several
//! threads, so tests can compare the results with a sequential run.

use ngramdb_core::{CoreResult, LanguageModel};
use std::thread;

/// Runs every query once, in order, on the current thread.
pub fn sequential_counts<M>(model: &M, queries: &[Vec<String>]) -> CoreResult<Vec<u64>>
where
    M: LanguageModel + ?Sized,
{
    queries
        .iter()
        .map(|query| {
            let tokens: Vec<&str> = query.iter().map(String::as_str).collect();
            model.count(&tokens)
        })
        .collect()
}

/// Runs every query on each of `threads` threads at the same time.
///
/// Returns one result vector per thread, each in query order.
pub fn concurrent_counts<M>(
    model: &M,
    queries: &[Vec<String>],
    threads: usize,
) -> CoreResult<Vec<Vec<u64>>>
where
    M: LanguageModel + ?Sized,
{
    thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|_| scope.spawn(|| sequential_counts(model, queries)))
            .collect();

        workers
            .into_iter()
            .map(|worker| worker.join().expect("lookup thread panicked"))
            .collect()
    })
}
