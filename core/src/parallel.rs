//! Parallel map-and-collect used by the corpus build phases.

use crate::error::{Error, Result, TaskFailure};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Values keyed in input order, plus the tasks that produced none.
#[derive(Debug)]
pub struct MapOutcome<K, V> {
    pub values: IndexMap<K, V>,
    pub failures: Vec<TaskFailure>,
}

/// Runs `op` once per item and collects `key(item) -> value`.
///
/// `threads <= 1` runs on the calling thread; otherwise a dedicated pool of
/// `threads` workers is used and joined before returning. Each task is isolated:
/// an error or panic is logged, recorded in `failures` and its key is left out of
/// `values`. Insertion order follows `items` whatever the completion order.
pub fn map_collect<T, K, V, KF, F>(threads: usize, items: &[T], key: KF, op: F) -> Result<MapOutcome<K, V>>
where
    T: Sync,
    K: Hash + Eq + ToString + Send,
    V: Send,
    KF: Fn(&T) -> K + Sync,
    F: Fn(&T) -> Result<V> + Sync,
{
    let run = |item: &T| -> (K, Result<V>) {
        let result = match catch_unwind(AssertUnwindSafe(|| op(item))) {
            Ok(r) => r,
            Err(payload) => Err(Error::TaskPanicked(panic_message(payload.as_ref()))),
        };
        (key(item), result)
    };

    let results: Vec<(K, Result<V>)> = if threads <= 1 {
        items.iter().map(run).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| items.par_iter().map(run).collect())
    };

    let mut values = IndexMap::with_capacity(results.len());
    let mut failures = Vec::new();
    for (k, result) in results {
        match result {
            Ok(v) => {
                values.insert(k, v);
            }
            Err(e) => {
                let key = k.to_string();
                tracing::warn!(%key, error = %e, "task failed; key omitted");
                failures.push(TaskFailure { key, error: e.to_string() });
            }
        }
    }
    Ok(MapOutcome { values, failures })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
