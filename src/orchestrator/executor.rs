use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::error::{ExtractionError, Result};

/// Fan-out/fan-in over a list of work items: every handler runs
/// concurrently under a permit cap, and outcomes come back in launch
/// order, not completion order, once every item has settled.
pub(crate) async fn run_all_settled<U, T, F, Fut>(
    items: Vec<U>,
    max_concurrent: usize,
    handler: F,
) -> Vec<Result<T>>
where
    F: Fn(U) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let permits = Arc::new(Semaphore::new(max_concurrent));

    let tasks = items.into_iter().map(|item| {
        let permits = permits.clone();
        let work = handler(item);
        async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return Err(ExtractionError::Cancelled),
            };
            work.await
        }
    });

    join_all(tasks).await
}

/// All-or-nothing join: every outcome has already settled, so no session is
/// orphaned; the first failure in launch order is the one that surfaces.
pub(crate) fn all_or_first_error<T>(outcomes: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut first_error = None;

    for outcome in outcomes {
        match outcome {
            Ok(value) => values.push(value),
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(_) => {}
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn results_come_back_in_launch_order() {
        // later items finish first; order must still follow the input
        let outcomes = run_all_settled(vec![3u64, 2, 1], 3, |delay| async move {
            tokio::time::sleep(Duration::from_millis(delay * 20)).await;
            Ok(delay)
        })
        .await;

        let values: Vec<u64> = outcomes.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_cap() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outcomes = run_all_settled(vec![(); 8], 2, |_| {
            let running = running.clone();
            let peak = peak.clone();
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert_eq!(outcomes.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn all_units_settle_before_a_failure_surfaces() {
        let completed = Arc::new(AtomicUsize::new(0));

        let outcomes = run_all_settled(vec![0usize, 1, 2], 3, |index| {
            let completed = completed.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                if index == 0 {
                    Err(ExtractionError::Navigation("unit 0 failed".to_string()))
                } else {
                    Ok(index)
                }
            }
        })
        .await;

        assert_eq!(completed.load(Ordering::SeqCst), 3);
        let result = all_or_first_error(outcomes);
        assert!(matches!(result, Err(ExtractionError::Navigation(_))));
    }

    #[test]
    fn first_error_in_launch_order_wins() {
        let outcomes: Vec<Result<()>> = vec![
            Ok(()),
            Err(ExtractionError::SchemaViolation("second".to_string())),
            Err(ExtractionError::Navigation("third".to_string())),
        ];
        let err = all_or_first_error(outcomes).unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaViolation(_)));
    }
}
