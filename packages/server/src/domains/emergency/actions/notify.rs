//! Donor notification fan-out
//!
//! Best-effort side channel: selection and dispatch failures are logged and
//! reported as a zero-shaped result, never propagated to the request path
//! that triggered the notification.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::common::{BloodType, Location};
use crate::domains::emergency::models::DispatchSummary;
use crate::kernel::{PushPayload, ServerDeps};

/// Notify opted-in donors with push tokens within `max_distance_km` of
/// `center` about an urgent need for `blood_type`.
pub async fn notify_nearby_donors(
    deps: &ServerDeps,
    center: Location,
    blood_type: BloodType,
    max_distance_km: f64,
) -> DispatchSummary {
    let donors = match deps.store.find_eligible_donors(center, max_distance_km).await {
        Ok(donors) => donors,
        Err(e) => {
            warn!(error = %e, "Eligible-donor lookup failed; skipping fan-out");
            return DispatchSummary::default();
        }
    };

    // Same physical device may be stored twice across donor records
    // (reinstallation); keep the first occurrence of each token.
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    let mut non_empty = 0usize;
    for donor in &donors {
        if donor.push_token.is_empty() {
            continue;
        }
        non_empty += 1;
        if seen.insert(donor.push_token.clone()) {
            tokens.push(donor.push_token.clone());
        }
    }
    let duplicates_removed = non_empty - tokens.len();
    if duplicates_removed > 0 {
        info!(duplicates_removed, "Removed duplicate push tokens");
    }

    if tokens.is_empty() {
        // Normal outcome on an emergency path, not an error
        info!("No eligible donors in range; nothing to dispatch");
        return DispatchSummary {
            duplicates_removed,
            ..Default::default()
        };
    }

    let payload = PushPayload {
        title: "Emergency blood request".to_string(),
        body: format!(
            "Urgent need for {} blood near you. Open LifeLink to respond.",
            blood_type
        ),
        data: serde_json::json!({
            "blood_type": blood_type.label(),
            "latitude": center.latitude,
            "longitude": center.longitude,
        }),
    };

    info!(
        donors = donors.len(),
        tokens = tokens.len(),
        blood_type = %blood_type,
        "Dispatching emergency notification multicast"
    );

    match deps.push_service.send_multicast(&tokens, &payload).await {
        Ok(dispatch) => DispatchSummary {
            success_count: dispatch.success_count,
            failure_count: dispatch.failure_count,
            duplicates_removed,
            outcomes: dispatch.outcomes,
        },
        Err(e) => {
            warn!(error = %e, "Push delivery unreachable; notification dropped");
            DispatchSummary {
                duplicates_removed,
                ..Default::default()
            }
        }
    }
}
