//! Instance integrity checks.
//!
//! Checks the values of a loaded instance. Detects:
//! - Negative capacities, processing times, and weights
//! - Successor references outside the task range
//! - Tasks listed as their own successor
//! - Circular precedence dependencies (DAG validation)
//!
//! Evaluation never runs these checks: it only compares individual
//! precedence pairs. Run [`validate_instance`] after loading when the
//! instance source is untrusted.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::Instance;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A table's length disagrees with the task or resource count.
    DimensionMismatch,
    /// A capacity, processing time, or weight is negative.
    NegativeValue,
    /// A successor index is outside the task range.
    InvalidSuccessor,
    /// A task lists itself as successor.
    SelfLoop,
    /// Precedence graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates the values of an instance.
///
/// Checks:
/// 1. All capacities are non-negative
/// 2. All processing times and weights are non-negative
/// 3. No task is its own successor
/// 4. No circular precedence dependencies
///
/// Dimension and successor-range checks already ran in [`Instance::new`].
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    for (r, &cap) in instance.capacities().iter().enumerate() {
        if cap < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("Resource {r} has negative capacity {cap}"),
            ));
        }
    }

    for i in 0..instance.nb_tasks() {
        for r in 0..instance.nb_resources() {
            let pt = instance.processing_time(i, r);
            if pt < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!("Task {i} has negative processing time {pt} on resource {r}"),
                ));
            }
            let w = instance.weight(r, i);
            if w < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!("Task {i} has negative weight {w} on resource {r}"),
                ));
            }
        }

        if instance.successors(i).contains(&i) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfLoop,
                format!("Task {i} lists itself as successor"),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(instance) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the successor graph using DFS.
///
/// Self-loops are reported separately and skipped here.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
fn detect_cycles(instance: &Instance) -> Option<ValidationError> {
    let n = instance.nb_tasks();
    let mut visited = vec![false; n];
    let mut in_stack = vec![false; n];

    for node in 0..n {
        if !visited[node] && has_cycle_dfs(node, instance, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    instance: &Instance,
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    for &next in instance.successors(node) {
        if next == node {
            continue;
        }
        if in_stack[next] {
            return true; // Back edge → cycle
        }
        if !visited[next] && has_cycle_dfs(next, instance, visited, in_stack) {
            return true;
        }
    }

    in_stack[node] = false;
    false
}
