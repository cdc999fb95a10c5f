use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{ContactInfo, Location};
use crate::kernel::BloodBankRecord;

/// Blood bank row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BloodBank {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BloodBank {
    /// All banks, no filter; the emergency aggregator annotates and ranks
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let banks = sqlx::query_as::<_, BloodBank>("SELECT * FROM blood_banks ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(banks)
    }

    /// Convert into the kernel record shape, validating stored coordinates
    pub fn into_record(self) -> Result<BloodBankRecord> {
        let location = Location::new(self.latitude, self.longitude)
            .with_context(|| format!("blood bank {} has invalid coordinates", self.id))?;

        let contact = if self.phone.is_some() || self.email.is_some() || self.address.is_some() {
            Some(ContactInfo {
                phone: self.phone,
                email: self.email,
                address: self.address,
            })
        } else {
            None
        };

        Ok(BloodBankRecord {
            id: self.id,
            name: self.name,
            location,
            contact,
        })
    }
}
