//! Candidate aggregation
//!
//! Merges trusted storage records with external places-lookup hits into one
//! deduplicated, distance-annotated candidate list. Pure read; the external
//! fetch degrades to empty on failure so an emergency request never hard-fails
//! on a third party.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::common::utils::geo;
use crate::common::{BloodType, Location};
use crate::domains::compatibility;
use crate::domains::emergency::models::{Candidate, CandidateSource, MatchingConfig};
use crate::kernel::{PlaceHit, ServerDeps};

/// Why a collaborator's contribution was reduced to an empty set
#[derive(Debug)]
pub enum DegradedReason {
    PlaceLookupFailed(String),
}

/// Build the candidate list for one emergency request.
///
/// Trusted storage (banks and registered donors) and the external lookup
/// are independent reads and are fetched concurrently. Trusted candidates
/// are processed first so they win dedup ties against external hits.
pub async fn aggregate_candidates(
    deps: &ServerDeps,
    requester_location: Location,
    blood_type: Option<BloodType>,
) -> Result<Vec<Candidate>> {
    let cfg = &deps.matching;

    let (banks, donors, external) = tokio::join!(
        deps.store.find_banks(),
        deps.store.find_donors(),
        fetch_external(deps, requester_location, cfg)
    );
    let banks = banks?;
    let donors = donors?;

    let external = match external {
        Ok(hits) => hits,
        Err(DegradedReason::PlaceLookupFailed(e)) => {
            warn!(
                error = %e,
                "External places lookup degraded; continuing with trusted candidates only"
            );
            Vec::new()
        }
    };

    let mut candidates: Vec<Candidate> = Vec::new();

    for bank in banks {
        let mut available_units = None;
        let mut has_exact_match = false;
        let mut has_compatible_match = false;
        let mut total_compatible_units = 0;

        if let Some(required) = blood_type {
            // The compatible set includes the exact type (self-compatible),
            // so one inventory read covers both annotations.
            let compatible = compatibility::compatible_donor_types(required);
            let levels = deps
                .store
                .find_inventory_levels(bank.id, compatible)
                .await?;
            // A bank without a stock row is known to hold zero units; None
            // is reserved for sources whose availability is unknown.
            let exact_units = levels
                .iter()
                .find(|l| l.blood_type == required)
                .map(|l| l.units_available)
                .unwrap_or(0);
            available_units = Some(exact_units);
            has_exact_match = exact_units > 0;
            has_compatible_match = levels.iter().any(|l| l.units_available > 0);
            total_compatible_units = levels.iter().map(|l| l.units_available).sum();
        }

        let candidate = Candidate {
            id: Some(bank.id),
            name: bank.name,
            location: bank.location,
            contact: bank.contact,
            source: CandidateSource::Trusted,
            available_units,
            has_exact_match,
            has_compatible_match,
            total_compatible_units,
            distance_km: geo::distance_km(requester_location, bank.location),
        };
        push_unique(&mut candidates, candidate, cfg.dedup_epsilon_degrees);
    }

    for donor in donors {
        // A donor is a single person, not a stocked inventory; match flags
        // come from the donor's own blood type, availability stays unknown.
        let (has_exact_match, has_compatible_match) = match blood_type {
            Some(required) => (
                donor.blood_type == required,
                compatibility::is_compatible(donor.blood_type, required),
            ),
            None => (false, false),
        };

        let candidate = Candidate {
            id: Some(donor.id),
            name: donor.name,
            location: donor.location,
            contact: None,
            source: CandidateSource::Trusted,
            available_units: None,
            has_exact_match,
            has_compatible_match,
            total_compatible_units: 0,
            distance_km: geo::distance_km(requester_location, donor.location),
        };
        push_unique(&mut candidates, candidate, cfg.dedup_epsilon_degrees);
    }

    for hit in external {
        let candidate = Candidate {
            id: None,
            name: hit.name,
            location: hit.location,
            contact: None,
            source: CandidateSource::External,
            available_units: None,
            has_exact_match: false,
            has_compatible_match: false,
            total_compatible_units: 0,
            distance_km: geo::distance_km(requester_location, hit.location),
        };
        push_unique(&mut candidates, candidate, cfg.dedup_epsilon_degrees);
    }

    info!(
        count = candidates.len(),
        blood_type = ?blood_type.map(|t| t.label()),
        "Aggregated emergency candidates"
    );

    Ok(candidates)
}

async fn fetch_external(
    deps: &ServerDeps,
    center: Location,
    cfg: &MatchingConfig,
) -> Result<Vec<PlaceHit>, DegradedReason> {
    let hits = deps
        .places
        .search_nearby(center, cfg.default_radius_km, &cfg.donation_keywords)
        .await
        .map_err(|e| DegradedReason::PlaceLookupFailed(e.to_string()))?;

    let total = hits.len();
    let hits: Vec<PlaceHit> = hits
        .into_iter()
        .filter(|hit| is_donation_related(hit, &cfg.donation_keywords))
        .collect();

    debug!(
        kept = hits.len(),
        dropped = total - hits.len(),
        "Filtered external places by donation keywords"
    );

    Ok(hits)
}

/// Heuristic filter: name or description contains one of the donation
/// keywords, case-insensitive.
fn is_donation_related(hit: &PlaceHit, keywords: &[String]) -> bool {
    let mut haystack = hit.name.to_lowercase();
    if let Some(desc) = &hit.description {
        haystack.push(' ');
        haystack.push_str(&desc.to_lowercase());
    }
    keywords
        .iter()
        .any(|k| haystack.contains(&k.to_lowercase()))
}

/// Append unless an already-kept candidate looks like the same physical
/// entity: one name a case-insensitive substring of the other AND
/// coordinates within `epsilon` degrees on both axes. First seen wins.
fn push_unique(candidates: &mut Vec<Candidate>, candidate: Candidate, epsilon: f64) {
    let duplicate = candidates.iter().any(|kept| {
        names_overlap(&kept.name, &candidate.name)
            && (kept.location.latitude - candidate.location.latitude).abs() < epsilon
            && (kept.location.longitude - candidate.location.longitude).abs() < epsilon
    });
    if duplicate {
        debug!(name = %candidate.name, "Dropping duplicate candidate");
    } else {
        candidates.push(candidate);
    }
}

fn names_overlap(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, lat: f64, lng: f64, source: CandidateSource) -> Candidate {
        Candidate {
            id: None,
            name: name.to_string(),
            location: Location::new(lat, lng).unwrap(),
            contact: None,
            source,
            available_units: None,
            has_exact_match: false,
            has_compatible_match: false,
            total_compatible_units: 0,
            distance_km: 0.0,
        }
    }

    #[test]
    fn substring_names_at_same_spot_collapse() {
        let mut kept = Vec::new();
        push_unique(
            &mut kept,
            candidate("City Blood Bank", 10.0, 106.0, CandidateSource::Trusted),
            0.001,
        );
        push_unique(
            &mut kept,
            candidate(
                "City Blood Bank Center",
                10.0005,
                106.0005,
                CandidateSource::External,
            ),
            0.001,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, CandidateSource::Trusted);
    }

    #[test]
    fn same_name_far_apart_stays_separate() {
        let mut kept = Vec::new();
        push_unique(
            &mut kept,
            candidate("Red Cross", 10.0, 106.0, CandidateSource::Trusted),
            0.001,
        );
        push_unique(
            &mut kept,
            candidate("Red Cross", 10.5, 106.5, CandidateSource::External),
            0.001,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn unrelated_names_nearby_stay_separate() {
        let mut kept = Vec::new();
        push_unique(
            &mut kept,
            candidate("General Hospital", 10.0, 106.0, CandidateSource::Trusted),
            0.001,
        );
        push_unique(
            &mut kept,
            candidate("Saint Mary Clinic", 10.0001, 106.0001, CandidateSource::Trusted),
            0.001,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn keyword_filter_is_case_insensitive() {
        let keywords: Vec<String> = ["blood", "donation", "transfusion", "red cross"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let hit = PlaceHit {
            name: "RED CROSS Donation Center".to_string(),
            location: Location::new(10.0, 106.0).unwrap(),
            description: None,
        };
        assert!(is_donation_related(&hit, &keywords));

        let hit = PlaceHit {
            name: "City Bakery".to_string(),
            location: Location::new(10.0, 106.0).unwrap(),
            description: Some("Fresh bread daily".to_string()),
        };
        assert!(!is_donation_related(&hit, &keywords));

        let hit = PlaceHit {
            name: "Community Clinic".to_string(),
            location: Location::new(10.0, 106.0).unwrap(),
            description: Some("Offers BLOOD testing and transfusion services".to_string()),
        };
        assert!(is_donation_related(&hit, &keywords));
    }
}
