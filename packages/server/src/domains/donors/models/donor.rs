use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::common::utils::geo;
use crate::common::{BloodType, Location};
use crate::kernel::{DonorRecord, EligibleDonor};

/// Registered donor row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donor {
    pub id: Uuid,
    pub name: String,
    pub blood_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub push_token: Option<String>,
    pub emergency_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// All donors, no filter; the emergency aggregator annotates and ranks
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let donors = sqlx::query_as::<_, Donor>("SELECT * FROM donors ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(donors)
    }

    /// Convert into the kernel record shape, validating stored coordinates
    /// and the blood-type label. Returns None for unusable rows.
    pub fn into_record(self) -> Option<DonorRecord> {
        let Ok(location) = Location::new(self.latitude, self.longitude) else {
            warn!(donor_id = %self.id, "Skipping donor with invalid stored coordinates");
            return None;
        };
        let Ok(blood_type) = self.blood_type.parse::<BloodType>() else {
            warn!(donor_id = %self.id, "Skipping donor with unrecognized blood type");
            return None;
        };
        Some(DonorRecord {
            id: self.id,
            name: self.name,
            blood_type,
            location,
        })
    }

    /// Donors eligible for an emergency notification: opted in, holding a
    /// non-empty push token, registered within `radius_km` of `center`.
    ///
    /// Opt-in and token presence are pushed to SQL; the radius predicate is
    /// applied here with the haversine distance on the fetched rows.
    pub async fn find_eligible(
        center: Location,
        radius_km: f64,
        pool: &PgPool,
    ) -> Result<Vec<EligibleDonor>> {
        let rows = sqlx::query_as::<_, Donor>(
            "SELECT * FROM donors
             WHERE emergency_opt_in = TRUE
               AND push_token IS NOT NULL
               AND push_token <> ''",
        )
        .fetch_all(pool)
        .await?;

        let eligible = rows
            .into_iter()
            .filter_map(|row| {
                let Ok(location) = Location::new(row.latitude, row.longitude) else {
                    warn!(donor_id = %row.id, "Skipping donor with invalid stored coordinates");
                    return None;
                };
                let push_token = row.push_token?;
                (geo::distance_km(center, location) <= radius_km).then_some(EligibleDonor {
                    id: row.id,
                    push_token,
                    location,
                })
            })
            .collect();

        Ok(eligible)
    }
}
