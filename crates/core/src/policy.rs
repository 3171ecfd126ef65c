//! Tracker policy knobs for behaviours the data model leaves open.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What to do when a student submits a second outcome for the same round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateOutcomePolicy {
    /// Keep every submission as history.
    #[default]
    Append,
    /// Refuse the second submission with a conflict.
    Reject,
}

impl FromStr for DuplicateOutcomePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "reject" => Ok(Self::Reject),
            other => Err(CoreError::Validation(format!(
                "Invalid duplicate outcome policy '{other}'. Must be one of: append, reject"
            ))),
        }
    }
}

/// How participation status reacts when a verifier rejects an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectPolicy {
    /// Leave the status as it was, even if the rejected outcome caused it.
    #[default]
    KeepStatus,
    /// Re-derive ELIMINATED / IN_PROGRESS from the remaining outcomes.
    Recompute,
}

impl FromStr for RejectPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" | "keep_status" => Ok(Self::KeepStatus),
            "recompute" => Ok(Self::Recompute),
            other => Err(CoreError::Validation(format!(
                "Invalid reject policy '{other}'. Must be one of: keep, recompute"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackerPolicy {
    pub duplicate_outcomes: DuplicateOutcomePolicy,
    pub on_reject: RejectPolicy,
}
