//! Schedule quality metrics (KPIs).
//!
//! Computes performance indicators for a feasible candidate.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest finish time |
//! | Peak Usage | Highest concurrent weight per resource |
//! | Utilization | Σ(weight × duration) / (capacity × makespan) per resource |
//! | Avg Utilization | Mean over resources with a defined utilization |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::evaluation::{Evaluator, UsageProfile};
use crate::models::{CandidateSchedule, Instance};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest finish time.
    pub makespan: i64,
    /// Highest concurrent usage per resource.
    pub peak_usage: Vec<i64>,
    /// Consumed share of each resource's capacity over the makespan.
    /// `None` when capacity or makespan is zero.
    pub utilization: Vec<Option<f64>>,
    /// Mean of the defined utilizations (0.0 if none).
    pub avg_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a candidate scored by `evaluator`.
    ///
    /// Returns `None` if the candidate is infeasible.
    pub fn calculate(evaluator: &Evaluator<'_>, candidate: &CandidateSchedule) -> Option<Self> {
        let makespan = evaluator.check(candidate).makespan()?;
        let instance = evaluator.instance();
        let finish_times = evaluator.finish_times(candidate).ok()?;
        let policy = evaluator.config().event_policy;

        let mut area = vec![0i64; instance.nb_resources()];
        for i in 0..instance.nb_tasks() {
            let r = candidate.resource_index(instance, i)?;
            let duration = finish_times[i] - candidate.start_times[i];
            area[r] = area[r].saturating_add(instance.weight(r, i).saturating_mul(duration));
        }

        let peak_usage = (0..instance.nb_resources())
            .map(|r| {
                UsageProfile::for_resource(instance, candidate, &finish_times, r, policy)
                    .map(|p| p.peak())
            })
            .collect::<Option<Vec<_>>>()?;

        let utilization: Vec<Option<f64>> = area
            .iter()
            .zip(instance.capacities())
            .map(|(&a, &cap)| {
                (cap > 0 && makespan > 0).then(|| a as f64 / (cap as f64 * makespan as f64))
            })
            .collect();

        let defined: Vec<f64> = utilization.iter().flatten().copied().collect();
        let avg_utilization = if defined.is_empty() {
            0.0
        } else {
            defined.iter().sum::<f64>() / defined.len() as f64
        };

        Some(Self {
            makespan,
            peak_usage,
            utilization,
            avg_utilization,
        })
    }

    /// Computes KPIs with the default evaluator configuration.
    pub fn for_candidate(instance: &Instance, candidate: &CandidateSchedule) -> Option<Self> {
        Self::calculate(&Evaluator::new(instance), candidate)
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: i64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instance() -> Instance {
        // Resource 0 capacity 4, resource 1 capacity 0 (unused).
        Instance::new(
            vec![4, 0],
            vec![vec![4, 0], vec![2, 0]],
            vec![vec![2, 2], vec![0, 0]],
            vec![vec![], vec![]],
        )
        .unwrap()
    }

    #[test]
    fn test_kpi_feasible() {
        let inst = sample_instance();
        // Task 0 [0,4) w2, task 1 [1,3) w2
        let c = CandidateSchedule::new(vec![0, 0], vec![0, 1]);
        let kpi = ScheduleKpi::for_candidate(&inst, &c).unwrap();

        assert_eq!(kpi.makespan, 4);
        assert_eq!(kpi.peak_usage, vec![4, 0]);
        // area = 2*4 + 2*2 = 12 over 4*4 = 16
        assert!((kpi.utilization[0].unwrap() - 0.75).abs() < 1e-10);
        assert_eq!(kpi.utilization[1], None);
        assert!((kpi.avg_utilization - 0.75).abs() < 1e-10);
        assert!(kpi.meets_thresholds(4, 0.5));
        assert!(!kpi.meets_thresholds(3, 0.5));
    }

    #[test]
    fn test_kpi_infeasible() {
        let inst = sample_instance();
        let c = CandidateSchedule::new(vec![1, 0], vec![0, 0]);
        assert!(ScheduleKpi::for_candidate(&inst, &c).is_none());
    }

    #[test]
    fn test_kpi_zero_makespan() {
        let inst = Instance::new(vec![1], vec![vec![0]], vec![vec![1]], vec![vec![]]).unwrap();
        let c = CandidateSchedule::new(vec![0], vec![0]);
        let kpi = ScheduleKpi::for_candidate(&inst, &c).unwrap();
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.utilization, vec![None]);
        assert_eq!(kpi.avg_utilization, 0.0);
    }
}
