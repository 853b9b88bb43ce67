//! Problem and candidate models.
//!
//! Provides the data types for flexible cumulative scheduling: the
//! immutable problem [`Instance`] and the transient [`CandidateSchedule`]
//! scored against it.
//!
//! # Domain Mappings
//!
//! | u-cumulative | Manufacturing | Computing | Project |
//! |--------------|---------------|-----------|---------|
//! | Task | Operation | Job | Activity |
//! | Resource | Machine pool | Cluster | Crew |
//! | Weight | Units used | Cores | Workers |
//! | Capacity | Units available | Cores available | Crew size |

mod candidate;
mod instance;

pub use candidate::{CandidateSchedule, Violation, ViolationKind};
pub use instance::Instance;
