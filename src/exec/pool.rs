//! Run one task per column on a bounded rayon pool.
//!
//! A task never takes its siblings down: errors and panics are captured into
//! the task's [`TaskOutcome`] and the caller decides how to report them.

use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::domain::ColumnInfo;
use crate::error::{AppError, StageError};

/// Result of one column task.
#[derive(Debug)]
pub struct TaskOutcome<T> {
    pub column: String,
    pub result: Result<T, StageError>,
}

/// Build the run's worker pool. `None` uses every available core.
pub fn build_pool(jobs: Option<usize>) -> Result<ThreadPool, AppError> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("eda-worker-{i}"));
    if let Some(n) = jobs {
        if n == 0 {
            return Err(AppError::input("--jobs must be at least 1"));
        }
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| AppError::input(format!("Failed to start worker pool: {e}")))?;
    debug!(threads = pool.current_num_threads(), "worker pool ready");
    Ok(pool)
}

/// Run `task` once per column inside `pool` and wait for all of them.
///
/// Outcomes come back in the order of `columns`, whatever order the tasks
/// actually finished in.
pub fn run_column_tasks<T, F>(pool: &ThreadPool, columns: &[&ColumnInfo], task: F) -> Vec<TaskOutcome<T>>
where
    T: Send,
    F: Fn(&ColumnInfo) -> Result<T, StageError> + Sync,
{
    pool.install(|| {
        columns
            .par_iter()
            .map(|info| TaskOutcome {
                column: info.name.clone(),
                result: catch_unwind(AssertUnwindSafe(|| task(info)))
                    .unwrap_or_else(|payload| Err(StageError::Panicked(panic_message(payload.as_ref())))),
            })
            .collect()
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    }
}
