//! Flexible cumulative scheduling for the U-Engine ecosystem.
//!
//! Tasks each pick one of several compatible renewable resources, respect
//! precedence ordering, and share each resource's capacity with whatever
//! else runs there concurrently. This crate scores candidate schedules:
//! the makespan if feasible, a constant penalty otherwise. It does not
//! search, repair, or optimize; search drivers consume it as a black-box
//! [`evaluation::Objective`].
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Instance`, `CandidateSchedule`, `Violation`
//! - **`evaluation`**: Feasibility checks, cumulative usage sweep, scoring
//! - **`reader`**: Instance text format loader
//! - **`generator`**: Uniform random candidates
//! - **`validation`**: Instance integrity checks (negative values, DAG cycles)
//! - **`kpi`**: Makespan, peak usage, and utilization of feasible candidates
//!
//! # References
//!
//! - Baptiste, Le Pape & Nuijten (2001), "Constraint-Based Scheduling"
//! - Hartmann & Briskorn (2010), "A survey of variants and extensions of the RCPSP"

pub mod evaluation;
pub mod generator;
pub mod kpi;
pub mod models;
pub mod reader;
pub mod validation;
