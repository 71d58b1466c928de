//! Bounded executor.
//!
//! Runs an ordered list of [`Executable`]s with at most `limit` of them in
//! flight, and returns either every value in input order or the first error.
//!
//! ## Flow
//! 1. every builder is bound to one child token of the caller's token;
//! 2. tasks are launched in order onto a [`JoinSet`], waiting for a free slot whenever `limit` are running;
//! 3. a failing task latches its error and cancels the shared token;
//! 4. all launched tasks are awaited, then the latch decides the outcome.
//!
//! Under [`Policy::FailFast`] the latch is consulted before each launch, and
//! once it is set the remaining tasks are never started.

use std::{any::Any, sync::Arc};

use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::{
    config::{GatherConfig, Policy, validate_limit},
    error::{GatherError, TaskError},
    latch::FirstErrorLatch,
    task::{Executable, bind_all},
};

/// Run every task, at most `limit` at a time, and return the first error if any failed.
///
/// All tasks are launched even after a failure; tasks that check the shared
/// token will fail with [`TaskError::Canceled`] once it has been cancelled.
pub async fn gather<T>(
    ctx: &CancellationToken,
    limit: usize,
    fs: Vec<Executable<T>>,
) -> Result<Vec<T>, GatherError>
where
    T: Send + 'static,
{
    execute(ctx, limit, fs, Policy::RunToCompletion).await
}

/// Like [`gather`], but stops launching new tasks once a failure is observed.
///
/// Tasks already running are still awaited. The number of tasks skipped is
/// best-effort: it depends on how quickly the failure is observed relative to
/// the next launch.
pub async fn gather_soon<T>(
    ctx: &CancellationToken,
    limit: usize,
    fs: Vec<Executable<T>>,
) -> Result<Vec<T>, GatherError>
where
    T: Send + 'static,
{
    execute(ctx, limit, fs, Policy::FailFast).await
}

/// Executor with a validated [`GatherConfig`].
#[derive(Debug, Clone)]
pub struct Gather {
    cfg: GatherConfig,
}

impl Gather {
    pub fn new(cfg: GatherConfig) -> Result<Self, GatherError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub fn config(&self) -> &GatherConfig {
        &self.cfg
    }

    pub async fn run<T>(
        &self,
        ctx: &CancellationToken,
        fs: Vec<Executable<T>>,
    ) -> Result<Vec<T>, GatherError>
    where
        T: Send + 'static,
    {
        execute(ctx, self.cfg.limit, fs, self.cfg.policy).await
    }
}

#[instrument(
    level = "debug",
    skip_all,
    fields(tasks = fs.len(), limit = limit, policy = policy.as_str())
)]
async fn execute<T>(
    ctx: &CancellationToken,
    limit: usize,
    fs: Vec<Executable<T>>,
    policy: Policy,
) -> Result<Vec<T>, GatherError>
where
    T: Send + 'static,
{
    validate_limit(limit)?;

    let total = fs.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let scope = ctx.child_token();
    let tasks = bind_all(fs, &scope);
    let latch = Arc::new(FirstErrorLatch::new());

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut set: JoinSet<(usize, Option<T>)> = JoinSet::new();

    debug!(target: "gruppen.gather", "gather started");

    for (index, task) in tasks.into_iter().enumerate() {
        while let Some(joined) = set.try_join_next() {
            settle(joined, &mut slots, &latch, &scope);
        }
        while set.len() >= limit {
            if let Some(joined) = set.join_next().await {
                settle(joined, &mut slots, &latch, &scope);
            }
        }

        if policy == Policy::FailFast && latch.is_set() {
            debug!(
                target: "gruppen.gather",
                skipped = total - index,
                "failure latched; not launching remaining tasks"
            );
            break;
        }

        let latch = Arc::clone(&latch);
        let scope = scope.clone();
        trace!(target: "gruppen.gather", index, "dispatch");

        set.spawn(async move {
            match task().await {
                Ok(value) => (index, Some(value)),
                Err(err) => {
                    latch_failure(&latch, &scope, Some(index), err);
                    (index, None)
                }
            }
        });
    }

    while let Some(joined) = set.join_next().await {
        settle(joined, &mut slots, &latch, &scope);
    }

    if let Some(err) = latch.get() {
        debug!(target: "gruppen.gather", kind = err.kind(), "gather failed");
        return Err(GatherError::Task(err.clone()));
    }

    let missing = slots.iter().filter(|slot| slot.is_none()).count();
    if missing > 0 {
        return Err(GatherError::Incomplete { missing });
    }

    debug!(target: "gruppen.gather", "gather completed");
    Ok(slots.into_iter().flatten().collect())
}

/// Record a joined outcome: values go to their slot, join failures are latched.
fn settle<T>(
    joined: Result<(usize, Option<T>), JoinError>,
    slots: &mut [Option<T>],
    latch: &FirstErrorLatch,
    scope: &CancellationToken,
) {
    match joined {
        Ok((index, Some(value))) => {
            trace!(target: "gruppen.gather", index, "task succeeded");
            slots[index] = Some(value);
        }
        Ok((index, None)) => {
            trace!(target: "gruppen.gather", index, "task failed");
        }
        Err(err) => {
            let err = if err.is_panic() {
                TaskError::Panicked {
                    reason: panic_reason(err.into_panic()),
                }
            } else {
                TaskError::Canceled
            };
            latch_failure(latch, scope, None, err);
        }
    }
}

fn latch_failure(
    latch: &FirstErrorLatch,
    scope: &CancellationToken,
    index: Option<usize>,
    err: TaskError,
) {
    let kind = err.kind();
    if latch.record(err) {
        debug!(
            target: "gruppen.gather",
            index = ?index,
            kind,
            "first failure latched; cancelling shared token"
        );
    }
    scope.cancel();
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
