//! # gruppen-core
//!
//! Bounded concurrent gathering of independent tasks.
//!
//! Tasks are described as [`Executable`] builders. The executor binds all of
//! them to one shared [`CancellationToken`](tokio_util::sync::CancellationToken),
//! runs at most `limit` at a time, and returns either every value in input
//! order or the first error.
//!
//! | Entry point     | Policy                 | After the first failure                 |
//! |-----------------|------------------------|-----------------------------------------|
//! | [`gather`]      | run-to-completion      | every task is still launched and awaited |
//! | [`gather_soon`] | fail-fast              | no new tasks are launched                |
//!
//! ## Example
//! ```no_run
//! use gruppen_core::{TaskError, executable, gather};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), gruppen_core::GatherError> {
//! let ctx = CancellationToken::new();
//! let fs = (0..10)
//!     .map(|i| executable(move || async move { Ok::<_, TaskError>(i * 2) }))
//!     .collect();
//!
//! let doubled: Vec<u32> = gather(&ctx, 4, fs).await?;
//! assert_eq!(doubled[3], 6);
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::{GatherConfig, Policy};

mod error;
pub use error::{GatherError, TaskError};

mod gather;
pub use gather::{Gather, gather, gather_soon};

mod latch;
pub use latch::FirstErrorLatch;

pub mod probe;
pub use probe::ConcurrencyProbe;

pub mod task;
pub use task::{BoxTaskFuture, Executable, Task, bind_all, executable, executable_with, task};

pub mod prelude {
    pub use crate::error::{GatherError, TaskError};
    pub use crate::task::{Executable, executable, executable_with};
    pub use crate::{Gather, GatherConfig, Policy, gather, gather_soon};
}
