//! Parallel fan-out of per-query searches over a bounded worker pool.
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::backend::SimilarityBackend;
use crate::context::MatchContext;
use crate::errors::{MatchError, Result};
use crate::search::{self, MatchResult};

const PROGRESS_STEP: usize = 1000;

/// Flag to stop a running batch; tasks not yet started are reported as cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Checks if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a task produced no result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The search returned an error.
    Error(String),
    /// The search panicked.
    Panic(String),
    /// The batch was cancelled before the task started.
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Error(msg) => write!(f, "error: {msg}"),
            Self::Panic(msg) => write!(f, "panic: {msg}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Diagnostic of an isolated task failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFailure {
    /// Position of the query in the query set.
    pub query_index: usize,
    /// Original text of the query.
    pub query: String,
    /// Cause of the failure.
    pub reason: FailureReason,
}

/// Results of one batch.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Successful results, in query order.
    pub results: Vec<MatchResult>,
    /// Failed tasks, in query order.
    pub failures: Vec<TaskFailure>,
}

impl BatchOutcome {
    /// Classifies every result with `threshold`.
    #[must_use]
    pub fn classify(self, threshold: f64) -> Self {
        let results = self
            .results
            .into_iter()
            .map(|r| r.classify(threshold))
            .collect();
        Self {
            results,
            failures: self.failures,
        }
    }

    /// Number of queries the batch covered.
    pub fn len(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Checks if the batch covered no query.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs one independent task per query on a fixed-size pool.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    num_workers: usize,
    shows_progress: bool,
    cancel: Option<CancelToken>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            num_workers: Self::default_workers(),
            shows_progress: false,
            cancel: None,
        }
    }
}

impl Dispatcher {
    /// Creates an instance with `num_workers` threads (must be more than 0).
    pub fn new(num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(MatchError::input("Number of workers must not be 0."));
        }
        Ok(Self {
            num_workers,
            ..Self::default()
        })
    }

    /// `min(32, #cpus + 4)`.
    pub fn default_workers() -> usize {
        let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
        (cpus + 4).min(32)
    }

    /// Logs the progress every 1000 queries?
    pub const fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Observes `token` before starting each task.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of threads in the pool.
    pub const fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Searches the best match of every query in `ctx` with `backend`.
    ///
    /// The backend is checked against the context before any worker starts.
    pub fn dispatch(
        &self,
        backend: SimilarityBackend,
        ctx: &MatchContext,
    ) -> Result<BatchOutcome> {
        ctx.ensure_supports(backend)?;
        self.dispatch_with(ctx, |i| search::best_match(backend, ctx, i))
    }

    /// Runs `task` for every query index of `ctx`.
    ///
    /// A failing task is logged and reported in [`BatchOutcome::failures`]; the other
    /// tasks are unaffected. The pool lives for this call only.
    pub fn dispatch_with<F>(&self, ctx: &MatchContext, task: F) -> Result<BatchOutcome>
    where
        F: Fn(usize) -> Result<MatchResult> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_workers)
            .thread_name(|i| format!("match-worker-{i}"))
            .build()
            .map_err(|e| MatchError::input(format!("Could not build the worker pool: {e}")))?;

        let num_queries = ctx.num_queries();
        let processed = AtomicUsize::new(0);
        let start = Instant::now();

        // Indexed collection keeps the query order whatever the completion order is.
        let outcomes: Vec<std::result::Result<MatchResult, FailureReason>> = pool.install(|| {
            (0..num_queries)
                .into_par_iter()
                .map(|i| {
                    let outcome = self.run_task(i, &task);
                    let cnt = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if self.shows_progress && cnt % PROGRESS_STEP == 0 {
                        info!("Processed {cnt}/{num_queries} queries...");
                    }
                    outcome
                })
                .collect()
        });
        drop(pool);

        let mut batch = BatchOutcome::default();
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => batch.results.push(result),
                Err(reason) => {
                    let query = ctx.query(i).map_or("", |q| q.original()).to_string();
                    warn!("Query {i} ({query:?}) failed: {reason}");
                    batch.failures.push(TaskFailure {
                        query_index: i,
                        query,
                        reason,
                    });
                }
            }
        }
        info!(
            "Matched {} queries with {} failures in {} sec",
            batch.results.len(),
            batch.failures.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(batch)
    }

    fn run_task<F>(&self, i: usize, task: &F) -> std::result::Result<MatchResult, FailureReason>
    where
        F: Fn(usize) -> Result<MatchResult> + Sync,
    {
        if self.cancel.as_ref().map_or(false, CancelToken::is_cancelled) {
            return Err(FailureReason::Cancelled);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| task(i))) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(FailureReason::Error(e.to_string())),
            Err(payload) => Err(FailureReason::Panic(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
