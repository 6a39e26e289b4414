use std::fmt;
use std::str::FromStr;

/// What happens to the dependents of a job that exits nonzero.
///
/// - `Lenient`: the failed job still releases its direct dependents, which
///   then run as if it had succeeded (default behaviour).
/// - `Strict`: the failed job poisons its whole dependent subtree; every
///   descendant is marked invalid and never runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Lenient,
    Strict,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Lenient
    }
}

impl FailurePolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, FailurePolicy::Strict)
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(FailurePolicy::Lenient),
            "strict" => Ok(FailurePolicy::Strict),
            other => Err(format!(
                "invalid failure policy: {other} (expected \"lenient\" or \"strict\")"
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Lenient => f.write_str("lenient"),
            FailurePolicy::Strict => f.write_str("strict"),
        }
    }
}

/// Maximum number of simultaneously running jobs. `0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConcurrencyCap(usize);

impl ConcurrencyCap {
    pub const UNBOUNDED: ConcurrencyCap = ConcurrencyCap(0);

    pub fn new(limit: usize) -> Self {
        ConcurrencyCap(limit)
    }

    pub fn limit(self) -> Option<usize> {
        if self.0 == 0 { None } else { Some(self.0) }
    }

    /// Whether one more job may start while `running` jobs are live.
    pub fn has_room(self, running: usize) -> bool {
        self.0 == 0 || running < self.0
    }
}

impl FromStr for ConcurrencyCap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unlimited") {
            return Ok(ConcurrencyCap::UNBOUNDED);
        }
        s.parse::<usize>()
            .map(ConcurrencyCap)
            .map_err(|e| format!("invalid job limit {s:?}: {e}"))
    }
}

impl fmt::Display for ConcurrencyCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit() {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("unlimited"),
        }
    }
}
