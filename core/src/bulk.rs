//! Sequential bulk-delete execution.
//!
//! A bulk delete issues one delete call per selected key, awaited
//! sequentially so the success/failure tally is deterministic. A single
//! item's failure is logged and counted, never aborting the remaining
//! items; there is no cancellation. The caller reports the aggregate
//! outcome once, after the whole batch settles.

use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::{DeleteError, DeleteResult};
use crate::notify::Notice;
use crate::state::RowKey;

/// Host-supplied per-key deleter, boxed for the component boundary.
///
/// The `Result<(), String>` shape matches the engine's service-call
/// convention: the message is backend-supplied, already displayable.
pub type DeleteFn = Rc<dyn Fn(RowKey) -> LocalBoxFuture<'static, Result<(), String>>>;

/// Aggregate outcome of one bulk-delete batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Items deleted successfully.
    pub succeeded: usize,
    /// Items whose delete call failed.
    pub failed: usize,
}

impl BulkOutcome {
    /// Render the aggregate message reported after the batch.
    pub fn notice(&self, item_name: &str) -> Notice {
        if self.failed == 0 {
            Notice::success(format!("Deleted {} {}", self.succeeded, item_name))
        } else {
            Notice::warning(format!(
                "Deleted {} {}, {} failed",
                self.succeeded, item_name, self.failed
            ))
        }
    }
}

/// Delete each key in order, tallying successes and failures.
pub async fn delete_each<F, Fut>(keys: &[RowKey], op: F) -> BulkOutcome
where
    F: Fn(RowKey) -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    let mut outcome = BulkOutcome::default();
    for key in keys {
        let result: DeleteResult = op(key.clone()).await.map_err(|message| DeleteError {
            key: key.clone(),
            message,
        });
        match result {
            Ok(()) => outcome.succeeded += 1,
            Err(err) => {
                log::error!("{err}");
                outcome.failed += 1;
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_all_items_succeed() {
        let keys: Vec<RowKey> = vec!["1".into(), "2".into(), "3".into()];
        let outcome = delete_each(&keys, |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(outcome, BulkOutcome { succeeded: 3, failed: 0 });
        assert_eq!(outcome.notice("leads").message, "Deleted 3 leads");
    }

    #[tokio::test]
    async fn test_failures_counted_not_aborting() {
        let keys: Vec<RowKey> = (1..=5).map(|i| i.to_string()).collect();
        let attempted = RefCell::new(Vec::new());
        let outcome = delete_each(&keys, |key| {
            attempted.borrow_mut().push(key.clone());
            async move {
                if key == "2" || key == "4" {
                    Err("row locked".to_string())
                } else {
                    Ok(())
                }
            }
        })
        .await;

        // n = 5, k = 2 failures: every sibling still ran.
        assert_eq!(outcome, BulkOutcome { succeeded: 3, failed: 2 });
        assert_eq!(attempted.borrow().len(), 5);
        assert_eq!(
            outcome.notice("projects").message,
            "Deleted 3 projects, 2 failed"
        );
    }

    #[tokio::test]
    async fn test_sequential_order_is_deterministic() {
        let keys: Vec<RowKey> = vec!["a".into(), "b".into(), "c".into()];
        let order = RefCell::new(Vec::new());
        delete_each(&keys, |key| {
            order.borrow_mut().push(key);
            async { Ok::<(), String>(()) }
        })
        .await;
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_batch() {
        let outcome =
            futures::executor::block_on(delete_each(&[], |_| async { Ok::<(), String>(()) }));
        assert_eq!(outcome, BulkOutcome::default());
    }
}
