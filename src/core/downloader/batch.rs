use std::future::Future;

use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};

/// Run `task` over `items` with at most `concurrency` in flight.
///
/// Completion order is arbitrary, but results come back in input order: each
/// task is tagged with its index and the results are re-sorted before return.
/// Every task runs to completion; if any failed, the batch fails with a
/// [`LauncherError::Transfer`] carrying the failure count and the first
/// failure in input order.
pub async fn run_ordered<I, T, F, Fut>(
    label: &str,
    items: Vec<I>,
    concurrency: usize,
    task: F,
) -> LauncherResult<Vec<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = LauncherResult<T>>,
{
    let total = items.len();
    info!(
        "Starting {} batch: {} tasks, concurrency={}",
        label, total, concurrency
    );

    let mut results: Vec<(usize, LauncherResult<T>)> = stream::iter(items.into_iter().enumerate())
        .map(|(idx, item)| {
            let fut = task(item);
            async move { (idx, fut.await) }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(idx, _)| *idx);

    let mut values = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for (_, result) in results {
        match result {
            Ok(value) => values.push(value),
            Err(err) => failures.push(err),
        }
    }

    if failures.is_empty() {
        return Ok(values);
    }

    let failed = failures.len();
    for err in &failures {
        warn!("{} task failed: {}", label, err);
    }
    let first = failures.swap_remove(0);
    Err(LauncherError::Transfer {
        failed,
        total,
        first: Box::new(first),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn results_keep_input_order_despite_completion_order() {
        let items: Vec<u64> = vec![30, 1, 20, 5, 10];

        let out = run_ordered("sleepy", items.clone(), 5, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(ms * 2)
        })
        .await
        .unwrap();

        assert_eq!(out, vec![60, 2, 40, 10, 20]);
    }

    #[tokio::test]
    async fn failures_are_aggregated_after_all_tasks_ran() {
        let items = vec![1u32, 2, 3, 4];

        let err = run_ordered("mixed", items, 2, |n| async move {
            if n % 2 == 0 {
                Err(LauncherError::DownloadFailed {
                    url: format!("https://x/{}", n),
                    status: 404,
                })
            } else {
                Ok(n)
            }
        })
        .await
        .unwrap_err();

        match err {
            LauncherError::Transfer {
                failed,
                total,
                first,
            } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 4);
                assert!(first.to_string().contains("https://x/2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_batch_is_ok() {
        let out: Vec<u8> = run_ordered("empty", Vec::<u8>::new(), 4, |n| async move { Ok(n) })
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
