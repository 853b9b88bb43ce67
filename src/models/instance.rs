//! Problem instance model.
//!
//! An instance describes the tasks, the renewable resources they may run
//! on, the per-pair processing times and consumptions, and the precedence
//! graph. Instances are immutable once built; evaluators borrow them.
//!
//! # Compatibility
//! Task `i` may run on resource `r` unless both `processing_time(i, r)` and
//! `weight(r, i)` are zero. A task with a positive duration and zero weight
//! is compatible (it consumes nothing but still takes time).

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// A flexible cumulative scheduling instance.
///
/// Tables are stored the way they are indexed in the problem statement:
/// processing times by `[task][resource]`, weights by `[resource][task]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstanceTables", into = "InstanceTables")]
pub struct Instance {
    capacity: Vec<i64>,
    processing_time: Vec<Vec<i64>>,
    weights: Vec<Vec<i64>>,
    successors: Vec<Vec<usize>>,
    horizon: i64,
}

/// Serialized form of an [`Instance`]. The horizon is derived, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InstanceTables {
    capacity: Vec<i64>,
    processing_time: Vec<Vec<i64>>,
    weights: Vec<Vec<i64>>,
    successors: Vec<Vec<usize>>,
}

impl TryFrom<InstanceTables> for Instance {
    type Error = String;

    fn try_from(t: InstanceTables) -> Result<Self, Self::Error> {
        Instance::new(t.capacity, t.processing_time, t.weights, t.successors).map_err(|errors| {
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        })
    }
}

impl From<Instance> for InstanceTables {
    fn from(inst: Instance) -> Self {
        Self {
            capacity: inst.capacity,
            processing_time: inst.processing_time,
            weights: inst.weights,
            successors: inst.successors,
        }
    }
}

impl Instance {
    /// Builds an instance from in-memory tables.
    ///
    /// # Arguments
    /// * `capacity` - Capacity per resource. Its length fixes `nb_resources`.
    /// * `processing_time` - `[task][resource]` durations. Its length fixes `nb_tasks`.
    /// * `weights` - `[resource][task]` consumptions.
    /// * `successors` - Successor task indices per task.
    ///
    /// # Errors
    /// Returns every dimension mismatch and out-of-range successor found.
    /// Value-level checks (negative numbers, cycles) are left to
    /// [`crate::validation::validate_instance`].
    pub fn new(
        capacity: Vec<i64>,
        processing_time: Vec<Vec<i64>>,
        weights: Vec<Vec<i64>>,
        successors: Vec<Vec<usize>>,
    ) -> Result<Self, Vec<ValidationError>> {
        let nb_tasks = processing_time.len();
        let nb_resources = capacity.len();
        let mut errors = Vec::new();

        for (i, row) in processing_time.iter().enumerate() {
            if row.len() != nb_resources {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DimensionMismatch,
                    format!(
                        "Task {i} has {} processing times, expected {nb_resources}",
                        row.len()
                    ),
                ));
            }
        }

        if weights.len() != nb_resources {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!(
                    "Weight table has {} resource rows, expected {nb_resources}",
                    weights.len()
                ),
            ));
        }
        for (r, row) in weights.iter().enumerate() {
            if row.len() != nb_tasks {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DimensionMismatch,
                    format!("Resource {r} has {} weights, expected {nb_tasks}", row.len()),
                ));
            }
        }

        if successors.len() != nb_tasks {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!(
                    "Successor table has {} rows, expected {nb_tasks}",
                    successors.len()
                ),
            ));
        }
        for (i, succs) in successors.iter().enumerate() {
            for &j in succs {
                if j >= nb_tasks {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidSuccessor,
                        format!("Task {i} references unknown successor {j}"),
                    ));
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let horizon = processing_time
            .iter()
            .map(|row| row.iter().copied().max().unwrap_or(0))
            .fold(0i64, i64::saturating_add);

        Ok(Self {
            capacity,
            processing_time,
            weights,
            successors,
            horizon,
        })
    }

    /// Number of tasks.
    #[inline]
    pub fn nb_tasks(&self) -> usize {
        self.processing_time.len()
    }

    /// Number of resources.
    #[inline]
    pub fn nb_resources(&self) -> usize {
        self.capacity.len()
    }

    /// Capacity of resource `r`.
    #[inline]
    pub fn capacity(&self, r: usize) -> i64 {
        self.capacity[r]
    }

    /// All resource capacities.
    pub fn capacities(&self) -> &[i64] {
        &self.capacity
    }

    /// Duration of task `i` when run on resource `r`.
    #[inline]
    pub fn processing_time(&self, i: usize, r: usize) -> i64 {
        self.processing_time[i][r]
    }

    /// Consumption of task `i` on resource `r`.
    #[inline]
    pub fn weight(&self, r: usize, i: usize) -> i64 {
        self.weights[r][i]
    }

    /// Tasks that may not start before task `i` finishes.
    pub fn successors(&self, i: usize) -> &[usize] {
        &self.successors[i]
    }

    /// Number of successors of task `i`.
    pub fn nb_successors(&self, i: usize) -> usize {
        self.successors[i].len()
    }

    /// Sum over tasks of their longest processing time, saturating at
    /// `i64::MAX`.
    ///
    /// Only bounds random start times; evaluation does not enforce it.
    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    /// Whether task `i` may run on resource `r`.
    #[inline]
    pub fn is_compatible(&self, i: usize, r: usize) -> bool {
        !(self.processing_time(i, r) == 0 && self.weight(r, i) == 0)
    }

    /// Resources able to process task `i`, ascending.
    pub fn compatible_resources(&self, i: usize) -> Vec<usize> {
        (0..self.nb_resources())
            .filter(|&r| self.is_compatible(i, r))
            .collect()
    }
}
