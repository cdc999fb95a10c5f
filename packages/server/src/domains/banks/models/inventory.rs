use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::BloodType;
use crate::kernel::InventoryLevel;

/// Inventory row: units of one blood type held by one bank
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BloodInventory {
    pub id: Uuid,
    pub bank_id: Uuid,
    pub blood_type: String,
    pub units_available: i64,
    pub updated_at: DateTime<Utc>,
}

impl BloodInventory {
    /// Current levels a bank holds for the given blood types. Types without
    /// a stock row are omitted; rows with labels outside the canonical eight
    /// are skipped.
    pub async fn find_levels(
        bank_id: Uuid,
        types: &[BloodType],
        pool: &PgPool,
    ) -> Result<Vec<InventoryLevel>> {
        let labels: Vec<String> = types.iter().map(|t| t.label().to_string()).collect();

        let rows = sqlx::query_as::<_, BloodInventory>(
            "SELECT * FROM blood_inventory WHERE bank_id = $1 AND blood_type = ANY($2)",
        )
        .bind(bank_id)
        .bind(&labels)
        .fetch_all(pool)
        .await?;

        let levels = rows
            .into_iter()
            .filter_map(|row| {
                let blood_type = row.blood_type.parse::<BloodType>().ok()?;
                Some(InventoryLevel {
                    blood_type,
                    units_available: row.units_available,
                })
            })
            .collect();

        Ok(levels)
    }
}
