//! Postgres-backed storage collaborator
//!
//! Thin adapter that satisfies `BaseBloodStore` by delegating to the domain
//! models' sqlx queries.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::common::{BloodType, Location};
use crate::domains::banks::models::{BloodBank, BloodInventory};
use crate::domains::donors::models::Donor;
use crate::kernel::{BaseBloodStore, BloodBankRecord, DonorRecord, EligibleDonor, InventoryLevel};

pub struct PostgresBloodStore {
    pool: PgPool,
}

impl PostgresBloodStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseBloodStore for PostgresBloodStore {
    async fn find_banks(&self) -> Result<Vec<BloodBankRecord>> {
        let banks = BloodBank::find_all(&self.pool).await?;

        // A single corrupt row should not take down the emergency flow
        let records = banks
            .into_iter()
            .filter_map(|bank| match bank.into_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping unusable blood bank row");
                    None
                }
            })
            .collect();

        Ok(records)
    }

    async fn find_donors(&self) -> Result<Vec<DonorRecord>> {
        let donors = Donor::find_all(&self.pool).await?;

        Ok(donors
            .into_iter()
            .filter_map(Donor::into_record)
            .collect())
    }

    async fn find_inventory_levels(
        &self,
        owner_id: Uuid,
        types: &[BloodType],
    ) -> Result<Vec<InventoryLevel>> {
        BloodInventory::find_levels(owner_id, types, &self.pool).await
    }

    async fn find_eligible_donors(
        &self,
        center: Location,
        radius_km: f64,
    ) -> Result<Vec<EligibleDonor>> {
        Donor::find_eligible(center, radius_km, &self.pool).await
    }
}
