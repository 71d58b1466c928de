//! Logging bootstrap for gruppen binaries.
//!
//! Installs a global `tracing` subscriber in one of three shapes: human
//! readable text, JSON lines, or journald (behind the `journald` feature).
mod logger;
pub use logger::*;
