// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "aggregate candidates") should be domain functions
// that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseBloodStore)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{BloodType, ContactInfo, Location};

// =============================================================================
// Storage Trait (Infrastructure - blood banks, inventory, donors)
// =============================================================================

/// A blood bank record from trusted storage
#[derive(Debug, Clone)]
pub struct BloodBankRecord {
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    pub contact: Option<ContactInfo>,
}

/// Current stock of one blood type held by a bank
#[derive(Debug, Clone)]
pub struct InventoryLevel {
    pub blood_type: BloodType,
    pub units_available: i64,
}

/// A registered donor record from trusted storage
#[derive(Debug, Clone)]
pub struct DonorRecord {
    pub id: Uuid,
    pub name: String,
    pub blood_type: BloodType,
    pub location: Location,
}

/// A donor eligible for emergency notification: opted in, has a push token,
/// and registered within the search radius.
#[derive(Debug, Clone)]
pub struct EligibleDonor {
    pub id: Uuid,
    pub push_token: String,
    pub location: Location,
}

#[async_trait]
pub trait BaseBloodStore: Send + Sync {
    /// All blood banks known to trusted storage (no filter)
    async fn find_banks(&self) -> Result<Vec<BloodBankRecord>>;

    /// All registered donors known to trusted storage (no filter)
    async fn find_donors(&self) -> Result<Vec<DonorRecord>>;

    /// Inventory levels a bank holds for the given blood types.
    /// Types with no stock row may be omitted from the result.
    async fn find_inventory_levels(
        &self,
        owner_id: Uuid,
        types: &[BloodType],
    ) -> Result<Vec<InventoryLevel>>;

    /// Donors matching the notification predicate: opted in for emergency
    /// contact AND holding a non-empty push token AND within `radius_km`
    /// of `center`.
    async fn find_eligible_donors(
        &self,
        center: Location,
        radius_km: f64,
    ) -> Result<Vec<EligibleDonor>>;
}

// =============================================================================
// Place Lookup Trait (Infrastructure - external, read-only, may time out)
// =============================================================================

/// A candidate place returned by the external lookup
#[derive(Debug, Clone)]
pub struct PlaceHit {
    pub name: String,
    pub location: Location,
    pub description: Option<String>,
}

#[async_trait]
pub trait BasePlaceLookup: Send + Sync {
    /// Search for places near `center` matching the given keywords.
    /// Implementations must bound this call with a timeout; callers treat
    /// failure as an empty result.
    async fn search_nearby(
        &self,
        center: Location,
        radius_km: f64,
        keywords: &[String],
    ) -> Result<Vec<PlaceHit>>;
}

// =============================================================================
// Push Delivery Trait (Infrastructure - fire-and-forget multicast)
// =============================================================================

/// Payload for a multicast push notification
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Outcome of delivery to a single token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenOutcome {
    pub token: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-token breakdown of a multicast dispatch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushDispatch {
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<TokenOutcome>,
}

#[async_trait]
pub trait BasePushDelivery: Send + Sync {
    /// Send one payload to many device tokens in a single batched call.
    /// Returns the per-token breakdown reported by the delivery backend.
    async fn send_multicast(&self, tokens: &[String], payload: &PushPayload)
        -> Result<PushDispatch>;
}
