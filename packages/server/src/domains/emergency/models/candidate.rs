use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{ContactInfo, Location};

/// Where a candidate record originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    /// From our own storage (banks, registered donors)
    Trusted,
    /// From the third-party places lookup; availability unknown
    External,
}

/// A prospective blood source produced by the aggregation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Storage id for trusted candidates; external hits have none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    pub source: CandidateSource,
    /// Units of the requested type on hand. Some(0) for a trusted bank with
    /// no stock row (known-zero); None where availability is unknown
    /// (external hits, individual donors, or no type requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_units: Option<i64>,
    pub has_exact_match: bool,
    pub has_compatible_match: bool,
    pub total_compatible_units: i64,
    /// Derived per-request from the requester's location, never stored
    pub distance_km: f64,
}

/// Output of the ranking engine: the full ranked list plus whether the
/// radius constraint was dropped to find anything at all.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidates {
    pub results: Vec<Candidate>,
    pub expanded: bool,
}

/// Tunables for aggregation, dedup, and the fallback search.
///
/// The dedup heuristic (substring name match within a small coordinate
/// epsilon) is deliberately configurable: generic facility names can cause
/// false merges, so deployments may want a tighter epsilon.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Radius filter applied by the ranking engine when the caller gives none
    pub default_radius_km: f64,
    /// How many nearest candidates the expanded search keeps
    pub fallback_limit: usize,
    /// Coordinate epsilon (degrees, both axes) for duplicate detection, ~100m
    pub dedup_epsilon_degrees: f64,
    /// Keywords identifying donation-related external places
    pub donation_keywords: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 50.0,
            fallback_limit: 5,
            dedup_epsilon_degrees: 0.001,
            donation_keywords: vec![
                "blood".to_string(),
                "donation".to_string(),
                "transfusion".to_string(),
                "red cross".to_string(),
            ],
        }
    }
}
