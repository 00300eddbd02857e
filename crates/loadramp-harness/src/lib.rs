//! `loadramp-harness` — subprocess driver for the external load-test harness.
//!
//! The harness is an opaque command (`tclsh test.tcl` in the stock setup).
//! One invocation runs it to completion, captures combined stdout/stderr,
//! persists that to the configured log file, and re-reads the file as the
//! log source the retry loop evaluates. The file is the source of truth, not
//! the in-memory capture; anything else that appends to it between run and
//! read is deliberately picked up.
//!
//! There is no timeout: a hung harness blocks the retry loop, by contract.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, info};

// ─── Errors ───────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("harness command is empty")]
    EmptyCommand,

    #[error("harness program not found: {0}")]
    ProgramNotFound(String),

    #[error("harness exited with code {code}: {tail}")]
    Exit { code: i32, tail: String },

    #[error("harness terminated by signal")]
    Signal,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

// ─── HarnessCommand ───────────────────────────────────────────────────────

/// A runnable harness invocation: program, arguments, working directory,
/// and the log file its output is persisted to.
#[derive(Debug, Clone)]
pub struct HarnessCommand {
    program: String,
    args: Vec<String>,
    root: PathBuf,
    log_path: PathBuf,
}

impl HarnessCommand {
    /// Split a whitespace-separated command line into program and
    /// arguments. The harness command carries no shell quoting: it is a
    /// plain argv, the same contract the scenario tooling uses.
    pub fn from_command_line(command: &str, root: &Path, log_path: &Path) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_owned);
        let program = words.next().ok_or(HarnessError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
            root: root.to_path_buf(),
            log_path: log_path.to_path_buf(),
        })
    }

    /// Run the harness to completion and return the log lines.
    ///
    /// A nonzero exit or a signal death is an error carrying the tail of
    /// the captured output; the log file is written first either way, so a
    /// failed run still leaves its output on disk for inspection.
    pub fn run(&self) -> Result<Vec<String>> {
        let program = resolve_program(&self.program, &self.root)?;
        debug!(program = %program.display(), args = ?self.args, "spawning harness");

        let output = Command::new(&program)
            .args(&self.args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    HarnessError::ProgramNotFound(self.program.clone())
                } else {
                    HarnessError::Io(e)
                }
            })?;

        // stdout first, then stderr. Capturing through separate pipes loses
        // interleaving; the predicate only cares about whole lines.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        std::fs::write(&self.log_path, &combined)?;

        if !output.status.success() {
            return Err(match output.status.code() {
                Some(code) => HarnessError::Exit {
                    code,
                    tail: tail_of(&combined, 500),
                },
                None => HarnessError::Signal,
            });
        }

        let log = std::fs::read_to_string(&self.log_path)?;
        let lines: Vec<String> = log.lines().map(str::to_owned).collect();
        info!(lines = lines.len(), log = %self.log_path.display(), "harness run captured");
        Ok(lines)
    }
}

impl loadramp_core::Harness for HarnessCommand {
    fn run(&mut self) -> loadramp_core::Result<Vec<String>> {
        HarnessCommand::run(self).map_err(|e| loadramp_core::RampError::Harness(e.to_string()))
    }
}

// ─── Internal ─────────────────────────────────────────────────────────────

/// Bare program names go through PATH lookup; anything with a path
/// separator is checked relative to the working directory (or as-is when
/// absolute), so `./harness.sh` resolves against the project root rather
/// than wherever loadramp itself was started.
fn resolve_program(program: &str, root: &Path) -> Result<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        if full.is_file() {
            return Ok(full);
        }
        return Err(HarnessError::ProgramNotFound(program.to_string()));
    }
    which::which(program).map_err(|_| HarnessError::ProgramNotFound(program.to_string()))
}

fn tail_of(text: &str, max: usize) -> String {
    let mut start = text.len().saturating_sub(max);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────
