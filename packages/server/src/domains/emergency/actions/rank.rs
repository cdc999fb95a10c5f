//! Ranking and fallback
//!
//! Filters candidates to the emergency radius and orders them by a priority
//! score. When nothing qualifies, the radius is dropped and the nearest few
//! candidates are returned instead, so a request never comes back empty while
//! any candidate exists anywhere.

use crate::domains::emergency::models::{Candidate, CandidateSource, RankedCandidates};

const TRUSTED_SOURCE_WEIGHT: f64 = 10.0;
const EXTERNAL_SOURCE_WEIGHT: f64 = 3.0;
const EXACT_MATCH_WEIGHT: f64 = 10.0;
const PARTIAL_MATCH_WEIGHT: f64 = 5.0;

/// Priority score for one candidate. Proximity contributes `1/(d+1)`,
/// bounded in (0, 1] so it breaks ties between otherwise equal candidates
/// without dominating the categorical weights.
pub fn priority_score(candidate: &Candidate) -> f64 {
    let source_weight = match candidate.source {
        CandidateSource::Trusted => TRUSTED_SOURCE_WEIGHT,
        CandidateSource::External => EXTERNAL_SOURCE_WEIGHT,
    };
    let exact_weight = if candidate.has_exact_match {
        EXACT_MATCH_WEIGHT
    } else {
        0.0
    };
    let partial_weight = if candidate.has_compatible_match && !candidate.has_exact_match {
        PARTIAL_MATCH_WEIGHT
    } else {
        0.0
    };
    let proximity_weight = 1.0 / (candidate.distance_km + 1.0);

    source_weight + exact_weight + partial_weight + proximity_weight
}

/// Rank candidates within `max_radius_km`, falling back to the nearest
/// `fallback_limit` regardless of radius when none qualify.
///
/// Returns the full ranked list; presentation truncation is the caller's
/// decision.
pub fn rank_and_filter(
    candidates: Vec<Candidate>,
    max_radius_km: f64,
    fallback_limit: usize,
) -> RankedCandidates {
    let mut within: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.distance_km <= max_radius_km)
        .cloned()
        .collect();

    if within.is_empty() {
        if candidates.is_empty() {
            return RankedCandidates {
                results: Vec::new(),
                expanded: false,
            };
        }
        // Expanded search: nearest-N by distance, radius ignored
        let mut all = candidates;
        all.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        all.truncate(fallback_limit);
        return RankedCandidates {
            results: all,
            expanded: true,
        };
    }

    within.sort_by(|a, b| {
        priority_score(b)
            .total_cmp(&priority_score(a))
            .then(a.distance_km.total_cmp(&b.distance_km))
    });

    RankedCandidates {
        results: within,
        expanded: false,
    }
}
