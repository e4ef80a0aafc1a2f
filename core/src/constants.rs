/// Denominator for every basis-point figure (100% == 10_000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Version of the commit-hash outcome derivation. Changing the derivation
/// in any way requires bumping this and the domain tag together.
pub const OUTCOME_VERSION: u8 = 1;

/// Domain separation tag prepended to the outcome seed preimage.
pub const OUTCOME_DOMAIN_TAG: &[u8; 14] = b"rocker.mine.v1";

/// Default upper bound on a sphere radius accepted for generation.
pub const DEFAULT_MAX_SPHERE_RADIUS: i64 = 64;

/// Hard ceiling for any configured radius bound. A sphere of this radius has
/// about 70 million blocks, and every `i64` product in the enumeration stays
/// far from overflow.
pub const SPHERE_RADIUS_LIMIT: i64 = 256;

/// Default ceiling on the caller-reported time spent on one attempt (one day).
pub const DEFAULT_MAX_TIME_SPENT_SECS: u64 = 86_400;
