use serde::Serialize;

use crate::common::{BloodType, Location};
use crate::kernel::TokenOutcome;

/// A single emergency request. Created once per incoming call, never
/// mutated; parameterizes one aggregate/rank pass.
#[derive(Debug, Clone)]
pub struct EmergencyRequest {
    pub requester_location: Location,
    /// None means "any source", skipping inventory annotation
    pub blood_type: Option<BloodType>,
    pub details: Option<String>,
}

/// Result of one notification fan-out, including the per-token breakdown
/// reported by the delivery backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchSummary {
    pub success_count: usize,
    pub failure_count: usize,
    /// Tokens dropped because the same device was stored more than once
    pub duplicates_removed: usize,
    pub outcomes: Vec<TokenOutcome>,
}
