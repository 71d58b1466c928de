//! Task abstraction for gathered execution.
//!
//! - [`Executable`]: caller-supplied builder, bound once to the shared [`CancellationToken`]
//! - [`Task`]: one-shot callable produced by a builder
//! - [`BoxTaskFuture`]: boxed future a task resolves to
//!
//! ## Rules
//! - Builders are bound before any task is dispatched, so every task observes the same token.
//! - Tasks built with [`executable`] / [`executable_with`] check `is_cancelled()` before doing any work.
//! - Cancellation is cooperative; an in-flight task is never aborted.

use std::{future::Future, pin::Pin};

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Boxed future returned by a [`Task`].
pub type BoxTaskFuture<T> = Pin<Box<dyn Future<Output = Result<T, TaskError>> + Send + 'static>>;

/// Zero-argument, one-shot unit of work.
pub type Task<T> = Box<dyn FnOnce() -> BoxTaskFuture<T> + Send + 'static>;

/// Task builder: turns the shared cancellation token into a [`Task`].
pub type Executable<T> = Box<dyn FnOnce(CancellationToken) -> Task<T> + Send + 'static>;

/// Box an async closure into a [`Task`] without any cancellation check.
///
/// Meant for raw builders which decide themselves whether to look at the token.
pub fn task<T, F, Fut>(f: F) -> Task<T>
where
    T: 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    Box::new(move || Box::pin(f()) as BoxTaskFuture<T>)
}

/// Cancellation-aware builder for work that does not need the token itself.
///
/// The produced task fails with [`TaskError::Canceled`] without calling `f`
/// when the shared token is already cancelled at invocation time.
pub fn executable<T, F, Fut>(f: F) -> Executable<T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    executable_with(move |_ctx| f())
}

/// Same as [`executable`], but hands the shared token to `f` so it can react
/// to cancellation while running.
pub fn executable_with<T, F, Fut>(f: F) -> Executable<T>
where
    T: Send + 'static,
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    Box::new(move |ctx: CancellationToken| {
        task(move || async move {
            if ctx.is_cancelled() {
                return Err(TaskError::Canceled);
            }
            f(ctx).await
        })
    })
}

/// Bind every builder to `ctx`, preserving input order.
pub fn bind_all<T>(fs: Vec<Executable<T>>, ctx: &CancellationToken) -> Vec<Task<T>> {
    fs.into_iter().map(|f| f(ctx.clone())).collect()
}
