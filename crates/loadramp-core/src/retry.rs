use crate::config::Settings;
use crate::error::{RampError, Result};
use crate::{archive, profile, scenario, verdict};
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// Harness seam
// ---------------------------------------------------------------------------

/// The external load-test harness, seen from the retry loop.
///
/// One call runs the harness to completion and returns the captured log
/// lines for predicate evaluation. Implementations live outside this crate
/// (`loadramp-harness` drives the real subprocess); tests plug in scripted
/// fakes.
pub trait Harness {
    fn run(&mut self) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Mutation pipeline
// ---------------------------------------------------------------------------

/// One full mutate cycle: locate the archive via the scenario file, safely
/// extract it, double every ramp-up height in its profile documents, and
/// repack the work tree under the same archive name.
pub fn mutate_cycle(root: &Path, settings: &Settings) -> Result<()> {
    let archive_name = scenario::archive_name(&settings.scenario_path(root))?;
    let export_name = archive::extract(root, settings, &archive_name)?;
    let profiles = profile::resolve(root, settings, &export_name)?;
    profile::double_ramp_up_heights(&profiles)?;
    archive::rebuild(root, settings)
}

// ---------------------------------------------------------------------------
// Retry controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Retrying,
    Done,
}

impl RetryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryState::Retrying => "Retrying",
            RetryState::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub state: RetryState,
    /// Mutate-and-rerun cycles that actually ran. Zero when the seed log
    /// already satisfied the predicate.
    pub cycles: u32,
}

/// Drives the harness to a successful run, doubling ramp-up heights between
/// attempts.
///
/// Starts in `Retrying` with a seed log. Each iteration evaluates the
/// success predicate; on failure it runs one mutation pipeline pass,
/// re-invokes the harness, and evaluates the fresh log. The loop is bounded
/// by `max_cycles`; exhausting the cap is an error, not an endless recursion.
pub struct RetryController<'a, H: Harness> {
    root: PathBuf,
    settings: &'a Settings,
    harness: H,
}

impl<'a, H: Harness> RetryController<'a, H> {
    pub fn new(root: &Path, settings: &'a Settings, harness: H) -> Self {
        Self {
            root: root.to_path_buf(),
            settings,
            harness,
        }
    }

    pub fn run(&mut self, seed: Vec<String>) -> Result<RetryOutcome> {
        let mut log = seed;
        let mut cycles = 0u32;

        loop {
            if verdict::run_succeeded(&log) {
                info!(cycles, "harness run succeeded");
                return Ok(RetryOutcome {
                    state: RetryState::Done,
                    cycles,
                });
            }
            if cycles >= self.settings.max_cycles {
                return Err(RampError::RetryLimit(self.settings.max_cycles));
            }

            cycles += 1;
            info!(cycle = cycles, "run unsuccessful, doubling ramp-up heights");
            mutate_cycle(&self.root, self.settings)?;
            log = self.harness.run()?;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
