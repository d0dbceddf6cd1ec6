// General
pub const DEFAULT_POOL_FACTOR: usize = 5;
pub const DEFAULT_STRATEGY: &str = "round_robin";
