//! Random candidate generation.
//!
//! Samples each task's resource uniformly among its compatible resources
//! and its start time uniformly in `[0, horizon]`. Candidates are not
//! repaired: most of them are infeasible and score the penalty.
//!
//! A task with no compatible resource is assigned resource 0, which the
//! evaluator then rejects as incompatible.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::{CandidateSchedule, Instance};

/// Draws one random candidate.
pub fn random_candidate<R: Rng>(instance: &Instance, rng: &mut R) -> CandidateSchedule {
    let n = instance.nb_tasks();
    let horizon = instance.horizon().max(0);
    let mut resources = Vec::with_capacity(n);
    let mut start_times = Vec::with_capacity(n);

    for i in 0..n {
        let compatible = instance.compatible_resources(i);
        let r = compatible.choose(rng).copied().unwrap_or(0);
        resources.push(r as i64);
        start_times.push(rng.random_range(0..=horizon));
    }

    CandidateSchedule::new(resources, start_times)
}

/// Draws `count` independent random candidates.
pub fn random_candidates<R: Rng>(
    instance: &Instance,
    count: usize,
    rng: &mut R,
) -> Vec<CandidateSchedule> {
    (0..count).map(|_| random_candidate(instance, rng)).collect()
}
