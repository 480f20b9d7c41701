//! The ordered fetch service consumed by the batch adapters.
//!
//! Callers see an index-ordered producer and nothing else: results come
//! back in job order regardless of which worker finished first, threads are
//! confined to a single call, and dropping the returned vector is the only
//! teardown there is.

use batchflow_core::BatchFlowError;

/// Runs `fetch(0..jobs)` on one scoped thread per job and returns the
/// results in job order.
///
/// A panicking worker is reported as a [`BatchFlowError::LoaderError`] at
/// its position instead of poisoning the whole window.
pub fn ordered_fetch<T, F>(jobs: usize, fetch: F) -> Vec<Result<T, BatchFlowError>>
where
    T: Send,
    F: Fn(usize) -> Result<T, BatchFlowError> + Sync,
{
    if jobs == 0 {
        return Vec::new();
    }
    std::thread::scope(|scope| {
        let fetch = &fetch;
        let handles: Vec<_> = (0..jobs)
            .map(|index| scope.spawn(move || fetch(index)))
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(_) => Err(BatchFlowError::LoaderError(
                    "fetch worker panicked".to_string(),
                )),
            })
            .collect()
    })
}

#[cfg(test)]
#[path = "prefetch_test.rs"]
mod tests;
