//! Configuration for decode operations

/// Treatment of erased symbols before syndrome computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErasurePolicy {
    /// Decode erased symbols as received
    #[default]
    Retain,
    /// Zero erased symbols first; the zeroing persists even if decoding fails
    Clear,
}

/// Configuration for decode operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub erasure_policy: ErasurePolicy,
    /// Recompute syndromes after correcting and reject words that still fail
    pub verify: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            erasure_policy: ErasurePolicy::Retain,
            verify: true,
        }
    }
}

impl DecoderConfig {
    pub fn new(erasure_policy: ErasurePolicy, verify: bool) -> Self {
        Self {
            erasure_policy,
            verify,
        }
    }

    /// Skip the post-correction syndrome check
    pub fn unverified() -> Self {
        Self {
            verify: false,
            ..Self::default()
        }
    }
}
