//! Bounded worker pool for independent per-URL work.
//!
//! Workers pull from a shared queue and send each result back over a channel;
//! a result is only ever written by the worker that produced it.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Mutex;

/// Runs `work` for every item with at most `max_concurrent` calls in flight.
/// Results come back in input order. `max_concurrent <= 1` runs inline on the
/// calling thread.
pub fn run_bounded<T, R, F>(items: Vec<T>, max_concurrent: usize, work: F) -> Vec<(T, R)>
where
    T: Send,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let count = items.len();
    if max_concurrent <= 1 || count <= 1 {
        return items
            .into_iter()
            .map(|item| {
                let r = work(&item);
                (item, r)
            })
            .collect();
    }

    let queue: Mutex<VecDeque<(usize, T)>> = Mutex::new(items.into_iter().enumerate().collect());
    let (tx, rx) = mpsc::channel();
    let num_workers = max_concurrent.min(count);

    std::thread::scope(|scope| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let queue = &queue;
            let work = &work;
            scope.spawn(move || loop {
                let next = match queue.lock() {
                    Ok(mut q) => q.pop_front(),
                    Err(poisoned) => poisoned.into_inner().pop_front(),
                };
                let Some((index, item)) = next else {
                    break;
                };
                let r = work(&item);
                if tx.send((index, item, r)).is_err() {
                    break;
                }
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, T, R)> = rx.into_iter().collect();
    results.sort_by_key(|(index, _, _)| *index);
    results.into_iter().map(|(_, item, r)| (item, r)).collect()
}

/// Fetches every URL through `fetcher`, at most `max_concurrent` at a time.
pub fn fetch_all(
    fetcher: &dyn super::TextFetcher,
    urls: Vec<String>,
    max_concurrent: usize,
) -> Vec<(String, Result<String, super::FetchError>)> {
    run_bounded(urls, max_concurrent, |url| fetcher.fetch(url))
}
