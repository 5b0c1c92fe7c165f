/// Capacity of the queues between pipeline stages.
///
/// tokio has no zero-capacity channel; one slot keeps each producer at most
/// one item ahead of its consumer.
pub const STAGE_CHANNEL_CAPACITY: usize = 1;

/// Default size of the scan and filter worker pools, and of the resolver's
/// in-flight limit.
pub const DEFAULT_WORKERS: usize = 4;
