//! Search orchestrator: fan-out, deadline-bounded fan-out, replica racing.
//!
//! Every aggregation launches one producer task per source, all writing to
//! a single shared channel, and collects results in arrival order. Replica
//! racing runs several such aggregations at once and keeps the first.

pub mod deadline;
pub mod fan_out;
pub mod race;
pub mod replica;
pub mod sequential;

pub use deadline::fan_out_with_deadline;
pub use fan_out::fan_out;
pub use race::{race_replicas, Race, RunningRace};
pub use replica::{launch_replica, ReplicaHandle};
pub use sequential::sequential;
