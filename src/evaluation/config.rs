//! Evaluator configuration.

use serde::{Deserialize, Serialize};

use super::PENALTY;

/// How events sharing a timestamp are applied during the capacity sweep.
///
/// The policies only differ when a start and a finish coincide on the
/// same resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPolicy {
    /// Sum every delta at a timestamp, then compare to capacity once.
    ///
    /// Order-independent. A task may start exactly when another ends.
    #[default]
    Aggregate,
    /// Apply finish events before start events at a tie, comparing after
    /// each event.
    FinishBeforeStart,
    /// Stable sort by time only, keeping task order, comparing after each
    /// event. A start listed before a coinciding finish can overflow
    /// transiently and reject a schedule the other policies accept.
    InsertionOrder,
}

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Score returned for every infeasible or malformed candidate.
    pub penalty: f64,
    /// Ordering of simultaneous events in the capacity sweep.
    pub event_policy: EventPolicy,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            penalty: PENALTY,
            event_policy: EventPolicy::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the penalty score.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Sets the simultaneous event policy.
    pub fn with_event_policy(mut self, policy: EventPolicy) -> Self {
        self.event_policy = policy;
        self
    }
}
