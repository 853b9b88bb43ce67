//! Candidate schedule model.
//!
//! A candidate is a resource choice and a start time per task, as produced
//! by a search procedure or a random generator. It is transient: built,
//! scored, discarded. Nothing in this crate mutates a candidate.
//!
//! Resource indices are signed so that out-of-range search output,
//! including negative indices, can be represented and rejected by the
//! evaluator rather than by the type system.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Instance;

/// A candidate schedule: resource per task and start time per task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSchedule {
    /// Chosen resource index per task (0-based).
    pub resources: Vec<i64>,
    /// Start time per task.
    pub start_times: Vec<i64>,
}

/// Why a candidate was rejected.
///
/// Kept internally for logging and diagnostics; the public score collapses
/// every kind into the same penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub kind: ViolationKind,
    /// Related task or resource index, when one applies.
    pub entity: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of candidate rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Candidate is not a pair of integer sequences of length `nb_tasks`.
    MalformedShape,
    /// Resource index outside `[0, nb_resources)`.
    InvalidResource,
    /// Task assigned to a resource with zero duration and zero weight.
    IncompatibleResource,
    /// A successor starts before its predecessor finishes.
    PrecedenceViolation,
    /// Concurrent usage exceeds a resource's capacity.
    CapacityExceeded,
    /// Start plus duration does not fit in an `i64`.
    TimeOverflow,
}

impl Violation {
    /// Creates a violation without a related entity.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity: None,
            message: message.into(),
        }
    }

    /// Attaches the related task or resource index.
    pub fn with_entity(mut self, entity: usize) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Creates a malformed shape violation.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::MalformedShape, message)
    }

    /// Creates a capacity exceeded violation.
    pub fn capacity_exceeded(resource: usize, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::CapacityExceeded, message).with_entity(resource)
    }

    /// Creates a precedence violation on the predecessor task.
    pub fn precedence_violation(task: usize, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::PrecedenceViolation, message).with_entity(task)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl CandidateSchedule {
    /// Creates a candidate from its two sequences.
    pub fn new(resources: Vec<i64>, start_times: Vec<i64>) -> Self {
        Self {
            resources,
            start_times,
        }
    }

    /// Number of tasks covered, or `None` if the two sequences disagree.
    pub fn len(&self) -> Option<usize> {
        (self.resources.len() == self.start_times.len()).then_some(self.resources.len())
    }

    /// Whether the candidate covers no task.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.start_times.is_empty()
    }

    /// Checks that both sequences cover exactly the instance's tasks.
    pub fn check_shape(&self, instance: &Instance) -> Result<(), Violation> {
        let n = instance.nb_tasks();
        if self.resources.len() != n || self.start_times.len() != n {
            return Err(Violation::malformed(format!(
                "Expected {n} resources and {n} start times, got {} and {}",
                self.resources.len(),
                self.start_times.len()
            )));
        }
        Ok(())
    }

    /// Resource of task `i` as an index, if it lies in `[0, nb_resources)`.
    pub fn resource_index(&self, instance: &Instance, i: usize) -> Option<usize> {
        let r = *self.resources.get(i)?;
        usize::try_from(r)
            .ok()
            .filter(|&r| r < instance.nb_resources())
    }

    /// Finish time of task `i`: start plus duration on its chosen resource.
    ///
    /// Returns `None` when the task or its resource is out of range, or the
    /// sum overflows.
    pub fn finish_time(&self, instance: &Instance, i: usize) -> Option<i64> {
        let r = self.resource_index(instance, i)?;
        self.start_times
            .get(i)?
            .checked_add(instance.processing_time(i, r))
    }

    /// Parses an untyped candidate.
    ///
    /// Accepts `[resources, start_times]` or
    /// `{"resources": [...], "start_times": [...]}` where every element is
    /// an integer. Lengths are not checked here; see [`Self::check_shape`].
    pub fn from_value(value: &Value) -> Result<Self, Violation> {
        let (resources, start_times) = match value {
            Value::Array(parts) if parts.len() == 2 => (&parts[0], &parts[1]),
            Value::Array(parts) => {
                return Err(Violation::malformed(format!(
                    "Expected a 2-element candidate, got {} elements",
                    parts.len()
                )))
            }
            Value::Object(map) => match (map.get("resources"), map.get("start_times")) {
                (Some(r), Some(s)) => (r, s),
                _ => {
                    return Err(Violation::malformed(
                        "Candidate object needs 'resources' and 'start_times'",
                    ))
                }
            },
            other => {
                return Err(Violation::malformed(format!(
                    "Candidate must be an array or object, got {other}"
                )))
            }
        };

        Ok(Self {
            resources: integer_sequence(resources, "resources")?,
            start_times: integer_sequence(start_times, "start_times")?,
        })
    }
}

fn integer_sequence(value: &Value, field: &str) -> Result<Vec<i64>, Violation> {
    let items = value
        .as_array()
        .ok_or_else(|| Violation::malformed(format!("'{field}' must be an array")))?;
    items
        .iter()
        .map(|v| {
            v.as_i64()
                .ok_or_else(|| Violation::malformed(format!("'{field}' holds non-integer {v}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_task_instance() -> Instance {
        Instance::new(
            vec![4],
            vec![vec![3], vec![2]],
            vec![vec![2, 2]],
            vec![vec![1], vec![]],
        )
        .unwrap()
    }

    #[test]
    fn test_check_shape() {
        let inst = two_task_instance();
        assert!(CandidateSchedule::new(vec![0, 0], vec![0, 3])
            .check_shape(&inst)
            .is_ok());

        let err = CandidateSchedule::new(vec![0], vec![0, 3])
            .check_shape(&inst)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::MalformedShape);
    }

    #[test]
    fn test_len() {
        assert_eq!(CandidateSchedule::new(vec![0, 1], vec![0, 0]).len(), Some(2));
        assert_eq!(CandidateSchedule::new(vec![0], vec![]).len(), None);
        assert!(CandidateSchedule::default().is_empty());
    }

    #[test]
    fn test_resource_index_bounds() {
        let inst = two_task_instance();
        let c = CandidateSchedule::new(vec![-1, 1], vec![0, 0]);
        assert_eq!(c.resource_index(&inst, 0), None);
        assert_eq!(c.resource_index(&inst, 1), None);
        assert_eq!(c.resource_index(&inst, 5), None);

        let ok = CandidateSchedule::new(vec![0, 0], vec![0, 0]);
        assert_eq!(ok.resource_index(&inst, 1), Some(0));
    }

    #[test]
    fn test_finish_time() {
        let inst = two_task_instance();
        let c = CandidateSchedule::new(vec![0, 0], vec![1, i64::MAX]);
        assert_eq!(c.finish_time(&inst, 0), Some(4));
        assert_eq!(c.finish_time(&inst, 1), None);
    }

    #[test]
    fn test_from_value_pair() {
        let c = CandidateSchedule::from_value(&json!([[0, 1], [5, 7]])).unwrap();
        assert_eq!(c.resources, vec![0, 1]);
        assert_eq!(c.start_times, vec![5, 7]);
    }

    #[test]
    fn test_from_value_object() {
        let c = CandidateSchedule::from_value(&json!({
            "resources": [-2],
            "start_times": [3]
        }))
        .unwrap();
        assert_eq!(c, CandidateSchedule::new(vec![-2], vec![3]));
    }

    #[test]
    fn test_from_value_malformed() {
        for value in [
            json!(42),
            json!([[0, 1]]),
            json!([[0], [1], [2]]),
            json!([[0.5], [1]]),
            json!([[0], "x"]),
            json!({"resources": [0]}),
        ] {
            let err = CandidateSchedule::from_value(&value).unwrap_err();
            assert_eq!(err.kind, ViolationKind::MalformedShape, "{value}");
        }
    }

    #[test]
    fn test_violation_factories() {
        let v = Violation::capacity_exceeded(2, "Over capacity");
        assert_eq!(v.kind, ViolationKind::CapacityExceeded);
        assert_eq!(v.entity, Some(2));

        let v = Violation::precedence_violation(0, "Too early");
        assert_eq!(v.kind, ViolationKind::PrecedenceViolation);
        assert!(v.to_string().starts_with("PrecedenceViolation"));
    }
}
