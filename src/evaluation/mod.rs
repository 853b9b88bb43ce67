//! Feasibility checking and makespan scoring.
//!
//! Scores a candidate schedule against an instance: the makespan if every
//! constraint holds, a single penalty value otherwise. Checks run in order
//! and stop at the first failure:
//!
//! 1. Shape: one resource and one start time per task
//! 2. Resources: index in range and compatible with the task
//! 3. Precedence: every successor starts no earlier than its predecessor finishes
//! 4. Capacity: per-resource cumulative usage sweep
//!
//! Malformed input never panics or errors; it scores the penalty, so a
//! search loop exploring arbitrary candidates cannot be aborted by one.
//!
//! # Usage
//!
//! ```
//! use u_cumulative::evaluation::{evaluate, PENALTY};
//! use u_cumulative::models::{CandidateSchedule, Instance};
//!
//! let instance = Instance::new(vec![5], vec![vec![3]], vec![vec![2]], vec![vec![]]).unwrap();
//! let candidate = CandidateSchedule::new(vec![0], vec![0]);
//! assert_eq!(evaluate(&instance, &candidate), 3.0);
//!
//! let bad = CandidateSchedule::new(vec![1], vec![0]);
//! assert_eq!(evaluate(&instance, &bad), PENALTY);
//! ```
//!
//! # Reference
//! Baptiste, Le Pape & Nuijten (2001), "Constraint-Based Scheduling", Ch. 2 (Cumulative Resources)

mod config;
mod evaluator;
mod profile;

pub use config::{EvaluatorConfig, EventPolicy};
pub use evaluator::{Evaluation, Evaluator};
pub use profile::{UsageEvent, UsagePoint, UsageProfile};

use serde_json::Value;

use crate::models::{CandidateSchedule, Instance};

/// Score of every infeasible or malformed candidate.
pub const PENALTY: f64 = 1e9;

/// A black-box objective minimized by a search driver.
///
/// # Score Convention
/// **Lower score = better.** Infeasible candidates share one constant
/// score, so the objective says nothing about which constraint failed.
pub trait Objective: Send + Sync {
    /// Scores a typed candidate.
    fn score(&self, candidate: &CandidateSchedule) -> f64;

    /// Scores an untyped candidate, penalizing any shape it cannot parse.
    fn score_value(&self, value: &Value) -> f64;
}

/// Scores `candidate` with the default configuration.
pub fn evaluate(instance: &Instance, candidate: &CandidateSchedule) -> f64 {
    Evaluator::new(instance).score(candidate)
}

/// Scores an untyped candidate with the default configuration.
pub fn evaluate_value(instance: &Instance, value: &Value) -> f64 {
    Evaluator::new(instance).score_value(value)
}
