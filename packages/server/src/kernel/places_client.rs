//! Nominatim (OpenStreetMap) places client
//!
//! Supplies external donation-center candidates for the aggregator. The call
//! is bounded by a configurable timeout so a slow third party cannot stall
//! the emergency flow; callers degrade to trusted-only results on failure.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::common::Location;
use crate::kernel::{BasePlaceLookup, PlaceHit};

/// Nominatim API response entry for a place search
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct NominatimPlacesClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl NominatimPlacesClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Bounding box around `center` spanning roughly `radius_km` in each
/// direction. One degree of latitude is ~111 km; longitude shrinks with
/// the cosine of the latitude.
fn bounding_box(center: Location, radius_km: f64) -> (f64, f64, f64, f64) {
    let dlat = radius_km / 111.0;
    let lat_cos = center.latitude.to_radians().cos().max(0.01);
    let dlon = radius_km / (111.0 * lat_cos);
    (
        (center.longitude - dlon).max(-180.0),
        (center.latitude + dlat).min(90.0),
        (center.longitude + dlon).min(180.0),
        (center.latitude - dlat).max(-90.0),
    )
}

#[async_trait]
impl BasePlaceLookup for NominatimPlacesClient {
    async fn search_nearby(
        &self,
        center: Location,
        radius_km: f64,
        keywords: &[String],
    ) -> Result<Vec<PlaceHit>> {
        let query = keywords.join(" ");
        let (left, top, right, bottom) = bounding_box(center, radius_km);
        let url = format!(
            "{}/search?q={}&format=json&limit=20&bounded=1&viewbox={},{},{},{}",
            self.base_url,
            urlencoding::encode(&query),
            left,
            top,
            right,
            bottom
        );

        debug!(query = %query, radius_km, "Searching external places");

        let response: Vec<NominatimPlace> = self
            .client
            .get(&url)
            .header("User-Agent", "LifeLink/1.0 (Emergency Blood Matching)")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("Places API request failed: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse places response: {}", e))?;

        let mut hits = Vec::with_capacity(response.len());
        for place in response {
            let (Ok(lat), Ok(lon)) = (place.lat.parse::<f64>(), place.lon.parse::<f64>()) else {
                warn!(name = %place.display_name, "Skipping place with unparseable coordinates");
                continue;
            };
            let Ok(location) = Location::new(lat, lon) else {
                warn!(name = %place.display_name, "Skipping place with out-of-range coordinates");
                continue;
            };
            let name = place
                .display_name
                .split(',')
                .next()
                .unwrap_or(&place.display_name)
                .trim()
                .to_string();
            hits.push(PlaceHit {
                name,
                location,
                description: Some(place.display_name),
            });
        }

        debug!(count = hits.len(), "External places lookup complete");
        Ok(hits)
    }
}
