//! Core mutation pipeline and retry state machine for `loadramp`.
//!
//! The pipeline runs one mutate cycle at a time, strictly serialized:
//!
//! ```text
//! scenario::archive_name   ← which .spf archive does config.tcl reference?
//!        │
//!        ▼
//! archive::extract         ← traversal-checked unpack, export-dir resolution
//!        │
//!        ▼
//! profile::resolve         ← list the XML load-profile documents
//!        │
//!        ▼
//! profile::double_ramp_up_heights
//!        │
//!        ▼
//! archive::rebuild         ← repack the whole work tree, same name
//! ```
//!
//! `retry::RetryController` wraps the pipeline in a bounded
//! mutate-and-rerun loop, driven by the success predicate in [`verdict`].
//! Everything is synchronous and single-threaded; no stage holds a file
//! open across stage boundaries, and two controllers must never share a
//! working directory.

pub mod archive;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod profile;
pub mod retry;
pub mod scenario;
pub mod verdict;

pub use config::Settings;
pub use error::{RampError, Result};
pub use retry::{Harness, RetryController, RetryOutcome, RetryState};
