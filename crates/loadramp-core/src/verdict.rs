use regex::Regex;
use std::sync::OnceLock;

static ATTEMPT_RE: OnceLock<Regex> = OnceLock::new();
static FAILURE_RE: OnceLock<Regex> = OnceLock::new();

fn attempt_re() -> &'static Regex {
    ATTEMPT_RE.get_or_init(|| Regex::new(r"Attempt").unwrap())
}

fn failure_re() -> &'static Regex {
    FAILURE_RE.get_or_init(|| Regex::new(r"Unsuccess\w*\b.*:\s*(\d+)").unwrap())
}

/// True when the line reports an unsuccessful outcome with a nonzero count.
/// A zero count ("Unsuccessful transactions: 0") is a clean run, not a
/// failure.
pub fn is_failure_line(line: &str) -> bool {
    failure_re()
        .captures(line)
        .and_then(|c| c.get(1).unwrap().as_str().parse::<u64>().ok())
        .is_some_and(|code| code != 0)
}

/// True when the line is evidence that a run actually happened.
pub fn is_attempt_line(line: &str) -> bool {
    attempt_re().is_match(line)
}

/// Success predicate over one harness log: at least one attempt marker AND
/// zero nonzero-code failure markers. Both must hold; a log with no
/// attempt lines is never a success, whatever else it says.
pub fn run_succeeded<S: AsRef<str>>(lines: &[S]) -> bool {
    let attempted = lines.iter().any(|l| is_attempt_line(l.as_ref()));
    let failed = lines.iter().any(|l| is_failure_line(l.as_ref()));
    attempted && !failed
}
