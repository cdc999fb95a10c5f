//! Emergency matching and notification endpoints

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{BloodType, Location};
use crate::domains::emergency::actions::{
    aggregate_candidates, notify_nearby_donors, rank_and_filter,
};
use crate::domains::emergency::models::{Candidate, DispatchSummary, EmergencyRequest};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Top-N shown to the caller; the ranking engine itself returns the full list
const PRESENTATION_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct LocationBody {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    requester_location: Option<LocationBody>,
    blood_type: Option<String>,
    max_radius_km: Option<f64>,
    /// Fan out push notifications to nearby donors in the background
    #[serde(default)]
    notify_donors: bool,
    details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub results: Vec<Candidate>,
    /// Matches before presentation truncation
    pub total_matches: usize,
    pub expanded: bool,
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    center: Option<LocationBody>,
    blood_type: Option<String>,
    max_distance_km: Option<f64>,
}

fn parse_location(body: Option<&LocationBody>, field: &str) -> Result<Location, ApiError> {
    let body = body.ok_or_else(|| ApiError::Validation(format!("{} is required", field)))?;
    let latitude = body
        .latitude
        .ok_or_else(|| ApiError::Validation(format!("{}.latitude is required", field)))?;
    let longitude = body
        .longitude
        .ok_or_else(|| ApiError::Validation(format!("{}.longitude is required", field)))?;
    Location::new(latitude, longitude).map_err(|e| ApiError::Validation(e.to_string()))
}

fn parse_blood_type(label: &str) -> Result<BloodType, ApiError> {
    label
        .parse::<BloodType>()
        .map_err(|e| ApiError::Validation(e.to_string()))
}

fn parse_radius(value: Option<f64>, default_km: f64) -> Result<f64, ApiError> {
    match value {
        None => Ok(default_km),
        Some(km) if km.is_finite() && km > 0.0 => Ok(km),
        Some(km) => Err(ApiError::Validation(format!(
            "radius must be a positive number, got {}",
            km
        ))),
    }
}

/// POST /api/emergency/match
///
/// Aggregates trusted and external candidates, ranks them, and returns the
/// top matches. When `notify_donors` is set and a blood type was given, the
/// donor fan-out is spawned in the background so it survives caller
/// cancellation; its outcome is logged, not returned.
pub async fn match_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let requester_location = parse_location(body.requester_location.as_ref(), "requester_location")?;
    let blood_type = body
        .blood_type
        .as_deref()
        .map(parse_blood_type)
        .transpose()?;
    let radius_km = parse_radius(body.max_radius_km, state.deps.matching.default_radius_km)?;

    let request = EmergencyRequest {
        requester_location,
        blood_type,
        details: body.details,
    };

    let candidates = aggregate_candidates(&state.deps, request.requester_location, request.blood_type)
        .await
        .map_err(ApiError::Internal)?;
    let ranked = rank_and_filter(candidates, radius_km, state.deps.matching.fallback_limit);
    let total_matches = ranked.results.len();

    if body.notify_donors {
        if let Some(blood_type) = request.blood_type {
            let deps = state.deps.clone();
            let center = request.requester_location;
            tokio::spawn(async move {
                let summary = notify_nearby_donors(&deps, center, blood_type, radius_km).await;
                info!(
                    success = summary.success_count,
                    failed = summary.failure_count,
                    "Background donor notification complete"
                );
            });
        }
    }

    let mut results = ranked.results;
    results.truncate(PRESENTATION_LIMIT);

    Ok(Json(MatchResponse {
        results,
        total_matches,
        expanded: ranked.expanded,
    }))
}

/// POST /api/emergency/notify
///
/// Runs the donor fan-out inline and returns the dispatch summary. Delivery
/// problems surface in the counts, never as an HTTP error.
pub async fn notify_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<NotifyRequest>,
) -> Result<Json<DispatchSummary>, ApiError> {
    let center = parse_location(body.center.as_ref(), "center")?;
    let blood_type = body
        .blood_type
        .as_deref()
        .ok_or_else(|| ApiError::Validation("blood_type is required".to_string()))
        .and_then(parse_blood_type)?;
    let max_distance_km =
        parse_radius(body.max_distance_km, state.deps.matching.default_radius_km)?;

    let summary = notify_nearby_donors(&state.deps, center, blood_type, max_distance_km).await;

    Ok(Json(summary))
}
