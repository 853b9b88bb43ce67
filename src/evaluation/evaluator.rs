//! Candidate evaluator.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{EvaluatorConfig, Objective, UsageProfile};
use crate::models::{CandidateSchedule, Instance, Violation, ViolationKind};

/// Outcome of a feasibility check, before collapsing to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Every constraint holds.
    Feasible {
        /// Latest finish time across all tasks.
        makespan: i64,
    },
    /// The first constraint found violated.
    Infeasible(Violation),
}

impl Evaluation {
    /// Whether the candidate passed every check.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible { .. })
    }

    /// Makespan of a feasible candidate.
    pub fn makespan(&self) -> Option<i64> {
        match self {
            Self::Feasible { makespan } => Some(*makespan),
            Self::Infeasible(_) => None,
        }
    }

    /// Violation of an infeasible candidate.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Feasible { .. } => None,
            Self::Infeasible(v) => Some(v),
        }
    }

    /// Collapses to a score: the makespan, or `penalty`.
    pub fn score(&self, penalty: f64) -> f64 {
        match self {
            Self::Feasible { makespan } => *makespan as f64,
            Self::Infeasible(_) => penalty,
        }
    }
}

impl From<Result<i64, Violation>> for Evaluation {
    fn from(result: Result<i64, Violation>) -> Self {
        match result {
            Ok(makespan) => Self::Feasible { makespan },
            Err(v) => Self::Infeasible(v),
        }
    }
}

/// Feasibility evaluator bound to one instance.
///
/// Stateless apart from its borrowed instance and configuration; one
/// evaluator may be shared across threads.
///
/// # Example
/// ```
/// use u_cumulative::evaluation::{Evaluator, EvaluatorConfig, EventPolicy, Objective};
/// use u_cumulative::models::{CandidateSchedule, Instance};
///
/// let instance = Instance::new(
///     vec![4],
///     vec![vec![3], vec![2]],
///     vec![vec![2, 2]],
///     vec![vec![], vec![]],
/// )
/// .unwrap();
/// let evaluator = Evaluator::with_config(
///     &instance,
///     EvaluatorConfig::new().with_event_policy(EventPolicy::FinishBeforeStart),
/// );
/// let candidate = CandidateSchedule::new(vec![0, 0], vec![0, 3]);
/// assert_eq!(evaluator.score(&candidate), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
    config: EvaluatorConfig,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with the default configuration.
    pub fn new(instance: &'a Instance) -> Self {
        Self::with_config(instance, EvaluatorConfig::default())
    }

    /// Creates an evaluator with the given configuration.
    pub fn with_config(instance: &'a Instance, config: EvaluatorConfig) -> Self {
        Self { instance, config }
    }

    /// The evaluated instance.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// The active configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Runs every check and reports the first failure.
    pub fn check(&self, candidate: &CandidateSchedule) -> Evaluation {
        let evaluation = Evaluation::from(self.run(candidate));
        if let Evaluation::Infeasible(v) = &evaluation {
            debug!("candidate rejected: {v}");
        }
        evaluation
    }

    /// Parses and checks an untyped candidate.
    pub fn check_value(&self, value: &Value) -> Evaluation {
        match CandidateSchedule::from_value(value) {
            Ok(candidate) => self.check(&candidate),
            Err(v) => {
                debug!("candidate rejected: {v}");
                Evaluation::Infeasible(v)
            }
        }
    }

    fn run(&self, candidate: &CandidateSchedule) -> Result<i64, Violation> {
        candidate.check_shape(self.instance)?;
        let finish_times = self.finish_times(candidate)?;
        self.check_precedence(candidate, &finish_times)?;
        self.check_capacity(candidate, &finish_times)?;
        Ok(finish_times.iter().copied().max().unwrap_or(0))
    }

    /// Validates each task's resource and derives its finish time.
    ///
    /// The candidate must already have the instance's shape.
    pub(crate) fn finish_times(&self, candidate: &CandidateSchedule) -> Result<Vec<i64>, Violation> {
        let instance = self.instance;
        (0..instance.nb_tasks())
            .map(|i| {
                let r = candidate.resource_index(instance, i).ok_or_else(|| {
                    Violation::new(
                        ViolationKind::InvalidResource,
                        format!(
                            "Task {i} assigned to resource {} outside [0, {})",
                            candidate.resources[i],
                            instance.nb_resources()
                        ),
                    )
                    .with_entity(i)
                })?;
                if !instance.is_compatible(i, r) {
                    return Err(Violation::new(
                        ViolationKind::IncompatibleResource,
                        format!("Task {i} cannot run on resource {r}"),
                    )
                    .with_entity(i));
                }
                candidate.finish_time(instance, i).ok_or_else(|| {
                    Violation::new(
                        ViolationKind::TimeOverflow,
                        format!("Task {i} finish time overflows"),
                    )
                    .with_entity(i)
                })
            })
            .collect()
    }

    fn check_precedence(
        &self,
        candidate: &CandidateSchedule,
        finish_times: &[i64],
    ) -> Result<(), Violation> {
        for (i, &finish) in finish_times.iter().enumerate() {
            for &j in self.instance.successors(i) {
                let start = candidate.start_times[j];
                // Equality allowed: a successor may start as its predecessor ends.
                if finish > start {
                    return Err(Violation::precedence_violation(
                        i,
                        format!("Task {j} starts at {start} before task {i} finishes at {finish}"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_capacity(
        &self,
        candidate: &CandidateSchedule,
        finish_times: &[i64],
    ) -> Result<(), Violation> {
        for r in 0..self.instance.nb_resources() {
            let profile = UsageProfile::for_resource(
                self.instance,
                candidate,
                finish_times,
                r,
                self.config.event_policy,
            )
            .ok_or_else(|| {
                Violation::capacity_exceeded(r, format!("Resource {r} usage overflows"))
            })?;
            let capacity = self.instance.capacity(r);
            trace!(
                "resource {r}: {} steps, peak {} / {capacity}",
                profile.points.len(),
                profile.peak()
            );
            if let Some(p) = profile.first_overflow(capacity) {
                return Err(Violation::capacity_exceeded(
                    r,
                    format!(
                        "Resource {r} uses {} at time {} (capacity {capacity})",
                        p.usage, p.time
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl Objective for Evaluator<'_> {
    fn score(&self, candidate: &CandidateSchedule) -> f64 {
        self.check(candidate).score(self.config.penalty)
    }

    fn score_value(&self, value: &Value) -> f64 {
        self.check_value(value).score(self.config.penalty)
    }
}
