use serde::Serialize;
use std::collections::BTreeMap;

use super::reference::ReferenceSite;

/// Result of cleaning one reference site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOutcome {
    pub site: ReferenceSite,
    /// Rows changed, or the reason the site could not be cleaned
    pub result: Result<u64, String>,
}

impl SiteOutcome {
    pub fn cleaned(site: ReferenceSite, rows: u64) -> Self {
        Self {
            site,
            result: Ok(rows),
        }
    }

    pub fn failed(site: ReferenceSite, reason: impl Into<String>) -> Self {
        Self {
            site,
            result: Err(reason.into()),
        }
    }
}

/// A cleanup failure as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    pub site: &'static str,
    pub error: String,
}

/// Per-site outcomes of the reference cleanup step.
///
/// Failures are kept next to the successes rather than folded into zero
/// counts so the caller can decide whether any of them should escalate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub outcomes: Vec<SiteOutcome>,
}

impl RemovalReport {
    pub fn new(outcomes: Vec<SiteOutcome>) -> Self {
        Self { outcomes }
    }

    /// Rows changed per site key. Failed sites report zero.
    pub fn removed(&self) -> BTreeMap<&'static str, u64> {
        self.outcomes
            .iter()
            .map(|o| (o.site.key, *o.result.as_ref().unwrap_or(&0)))
            .collect()
    }

    pub fn count_for(&self, key: &str) -> Option<u64> {
        self.outcomes
            .iter()
            .find(|o| o.site.key == key)
            .map(|o| *o.result.as_ref().unwrap_or(&0))
    }

    pub fn failures(&self) -> Vec<CleanupFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Ok(_) => None,
                Err(reason) => Some(CleanupFailure {
                    site: o.site.key,
                    error: reason.clone(),
                }),
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_err())
    }

    pub fn total_removed(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }
}
