//! Per-resource cumulative usage sweep.
//!
//! Each task assigned to a resource contributes a `+weight` event at its
//! start and a `-weight` event at its finish. Sorting the events by time
//! and accumulating them yields the resource's usage profile; the
//! capacity check is a scan of that profile.

use serde::{Deserialize, Serialize};

use super::EventPolicy;
use crate::models::{CandidateSchedule, Instance};

/// A timestamped usage change on one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageEvent {
    /// Event time.
    pub time: i64,
    /// Usage change (`+weight` on start, `-weight` on finish).
    pub delta: i64,
}

/// Running usage at one step of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePoint {
    /// Time of the step.
    pub time: i64,
    /// Usage after the step.
    pub usage: i64,
}

/// Usage profile of a single resource.
///
/// Under [`EventPolicy::Aggregate`] there is one point per distinct
/// timestamp; under the other policies one point per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageProfile {
    /// Resource index.
    pub resource: usize,
    /// Steps in sweep order.
    pub points: Vec<UsagePoint>,
}

impl UsageProfile {
    /// Builds the profile of resource `r`.
    ///
    /// `finish_times` must hold one finish per task. Tasks whose resource
    /// is not `r` are ignored, so out-of-range assignments never reach here.
    ///
    /// Returns `None` if the running usage leaves the `i64` range.
    pub fn for_resource(
        instance: &Instance,
        candidate: &CandidateSchedule,
        finish_times: &[i64],
        r: usize,
        policy: EventPolicy,
    ) -> Option<Self> {
        let mut events = Vec::new();
        for (i, (&res, &start)) in candidate
            .resources
            .iter()
            .zip(&candidate.start_times)
            .enumerate()
        {
            if usize::try_from(res).ok() != Some(r) {
                continue;
            }
            let w = instance.weight(r, i);
            events.push(UsageEvent {
                time: start,
                delta: w,
            });
            events.push(UsageEvent {
                time: finish_times[i],
                delta: w.checked_neg()?,
            });
        }
        Self::sweep(r, events, policy)
    }

    /// Sorts `events` according to `policy` and accumulates them.
    ///
    /// Returns `None` if the running usage leaves the `i64` range. Under
    /// [`EventPolicy::Aggregate`] only the net change of each timestamp
    /// has to fit.
    pub fn sweep(
        resource: usize,
        mut events: Vec<UsageEvent>,
        policy: EventPolicy,
    ) -> Option<Self> {
        let mut points = Vec::with_capacity(events.len());
        let mut usage = 0i64;

        match policy {
            EventPolicy::Aggregate => {
                events.sort_by_key(|e| e.time);
                for group in events.chunk_by(|a, b| a.time == b.time) {
                    let net: i128 = group.iter().map(|e| i128::from(e.delta)).sum();
                    usage = i64::try_from(i128::from(usage) + net).ok()?;
                    points.push(UsagePoint {
                        time: group[0].time,
                        usage,
                    });
                }
            }
            EventPolicy::FinishBeforeStart | EventPolicy::InsertionOrder => {
                if policy == EventPolicy::FinishBeforeStart {
                    events.sort_by_key(|e| (e.time, e.delta));
                } else {
                    events.sort_by_key(|e| e.time);
                }
                for e in events {
                    usage = usage.checked_add(e.delta)?;
                    points.push(UsagePoint {
                        time: e.time,
                        usage,
                    });
                }
            }
        }

        Some(Self { resource, points })
    }

    /// Highest usage reached (0 for an idle resource).
    pub fn peak(&self) -> i64 {
        self.points.iter().map(|p| p.usage).max().unwrap_or(0).max(0)
    }

    /// First step whose usage exceeds `capacity`.
    pub fn first_overflow(&self, capacity: i64) -> Option<UsagePoint> {
        self.points.iter().copied().find(|p| p.usage > capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(time: i64, delta: i64) -> UsageEvent {
        UsageEvent { time, delta }
    }

    // Task A: [5, 8) weight 3, listed first. Task B: [2, 5) weight 3.
    // At t=5, A's start is inserted before B's finish.
    fn handover_events() -> Vec<UsageEvent> {
        vec![ev(5, 3), ev(8, -3), ev(2, 3), ev(5, -3)]
    }

    #[test]
    fn test_aggregate_groups_timestamps() {
        let p = UsageProfile::sweep(0, handover_events(), EventPolicy::Aggregate).unwrap();
        let usages: Vec<_> = p.points.iter().map(|p| (p.time, p.usage)).collect();
        assert_eq!(usages, vec![(2, 3), (5, 3), (8, 0)]);
        assert_eq!(p.peak(), 3);
        assert_eq!(p.first_overflow(3), None);
    }

    #[test]
    fn test_finish_before_start() {
        let p = UsageProfile::sweep(0, handover_events(), EventPolicy::FinishBeforeStart).unwrap();
        assert_eq!(p.points.len(), 4);
        assert_eq!(p.peak(), 3);
        assert_eq!(p.first_overflow(3), None);
    }

    #[test]
    fn test_insertion_order_transient_overflow() {
        let p = UsageProfile::sweep(0, handover_events(), EventPolicy::InsertionOrder).unwrap();
        assert_eq!(p.peak(), 6);
        assert_eq!(p.first_overflow(3), Some(UsagePoint { time: 5, usage: 6 }));
    }

    #[test]
    fn test_zero_duration_task() {
        // Start and finish coincide; the task is never active.
        let events = vec![ev(4, 9), ev(4, -9)];
        let p = UsageProfile::sweep(0, events, EventPolicy::Aggregate).unwrap();
        assert_eq!(p.peak(), 0);
    }

    #[test]
    fn test_usage_overflow() {
        let big = i64::MAX / 2 + 1;
        let events = vec![ev(0, big), ev(0, big), ev(1, -big), ev(1, -big)];
        for policy in [
            EventPolicy::Aggregate,
            EventPolicy::FinishBeforeStart,
            EventPolicy::InsertionOrder,
        ] {
            assert_eq!(UsageProfile::sweep(0, events.clone(), policy), None);
        }
    }

    #[test]
    fn test_aggregate_only_net_change_must_fit() {
        // Start listed before a coinciding finish: the sequential sum would
        // overflow, the net change at t=1 is zero.
        let big = i64::MAX / 2 + 1;
        let events = vec![ev(0, big), ev(1, big), ev(1, -big), ev(2, -big)];
        let p = UsageProfile::sweep(0, events.clone(), EventPolicy::Aggregate).unwrap();
        assert_eq!(p.peak(), big);
        assert_eq!(UsageProfile::sweep(0, events, EventPolicy::InsertionOrder), None);
    }

    #[test]
    fn test_empty_profile() {
        let p = UsageProfile::sweep(1, Vec::new(), EventPolicy::Aggregate).unwrap();
        assert!(p.points.is_empty());
        assert_eq!(p.peak(), 0);
        assert_eq!(p.resource, 1);
    }

    #[test]
    fn test_for_resource_filters_tasks() {
        let inst = Instance::new(
            vec![5, 5],
            vec![vec![2, 2], vec![3, 3], vec![1, 1]],
            vec![vec![1, 2, 4], vec![1, 2, 4]],
            vec![vec![], vec![], vec![]],
        )
        .unwrap();
        let c = CandidateSchedule::new(vec![0, 1, 0], vec![0, 0, 1]);
        let finish = vec![2, 3, 2];

        let p0 = UsageProfile::for_resource(&inst, &c, &finish, 0, EventPolicy::Aggregate).unwrap();
        // Task 0 [0,2) w1, task 2 [1,2) w4
        assert_eq!(p0.peak(), 5);
        let p1 = UsageProfile::for_resource(&inst, &c, &finish, 1, EventPolicy::Aggregate).unwrap();
        assert_eq!(p1.peak(), 2);
    }
}
