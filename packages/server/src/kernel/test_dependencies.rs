// TestDependencies - mock implementations for testing
//
// Provides mock collaborators that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::common::{BloodType, Location};
use crate::domains::emergency::models::MatchingConfig;
use crate::kernel::{
    BaseBloodStore, BasePlaceLookup, BasePushDelivery, BloodBankRecord, DonorRecord,
    EligibleDonor, InventoryLevel, PlaceHit, PushDispatch, PushPayload, ServerDeps, TokenOutcome,
};

// =============================================================================
// Mock Blood Store
// =============================================================================

pub struct MockBloodStore {
    banks: Mutex<Vec<BloodBankRecord>>,
    donor_records: Mutex<Vec<DonorRecord>>,
    inventory: Mutex<Vec<(Uuid, InventoryLevel)>>,
    donors: Mutex<Vec<EligibleDonor>>,
    fail_banks: Mutex<bool>,
    fail_donors: Mutex<bool>,
    inventory_calls: Arc<Mutex<Vec<Uuid>>>,
}

impl MockBloodStore {
    pub fn new() -> Self {
        Self {
            banks: Mutex::new(Vec::new()),
            donor_records: Mutex::new(Vec::new()),
            inventory: Mutex::new(Vec::new()),
            donors: Mutex::new(Vec::new()),
            fail_banks: Mutex::new(false),
            fail_donors: Mutex::new(false),
            inventory_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_bank(self, id: Uuid, name: &str, lat: f64, lng: f64) -> Self {
        self.banks.lock().unwrap().push(BloodBankRecord {
            id,
            name: name.to_string(),
            location: Location::new(lat, lng).unwrap(),
            contact: None,
        });
        self
    }

    /// Registered donor visible to candidate aggregation
    pub fn with_donor_record(
        self,
        id: Uuid,
        name: &str,
        blood_type: BloodType,
        lat: f64,
        lng: f64,
    ) -> Self {
        self.donor_records.lock().unwrap().push(DonorRecord {
            id,
            name: name.to_string(),
            blood_type,
            location: Location::new(lat, lng).unwrap(),
        });
        self
    }

    pub fn with_inventory(self, bank_id: Uuid, blood_type: BloodType, units: i64) -> Self {
        self.inventory.lock().unwrap().push((
            bank_id,
            InventoryLevel {
                blood_type,
                units_available: units,
            },
        ));
        self
    }

    pub fn with_donor(self, token: &str, lat: f64, lng: f64) -> Self {
        self.donors.lock().unwrap().push(EligibleDonor {
            id: Uuid::new_v4(),
            push_token: token.to_string(),
            location: Location::new(lat, lng).unwrap(),
        });
        self
    }

    pub fn failing_bank_reads(self) -> Self {
        *self.fail_banks.lock().unwrap() = true;
        self
    }

    pub fn failing_donor_reads(self) -> Self {
        *self.fail_donors.lock().unwrap() = true;
        self
    }

    /// Bank ids whose inventory was queried
    pub fn inventory_calls(&self) -> Vec<Uuid> {
        self.inventory_calls.lock().unwrap().clone()
    }
}

impl Default for MockBloodStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseBloodStore for MockBloodStore {
    async fn find_banks(&self) -> Result<Vec<BloodBankRecord>> {
        if *self.fail_banks.lock().unwrap() {
            anyhow::bail!("mock storage unavailable");
        }
        Ok(self.banks.lock().unwrap().clone())
    }

    async fn find_donors(&self) -> Result<Vec<DonorRecord>> {
        if *self.fail_banks.lock().unwrap() {
            anyhow::bail!("mock storage unavailable");
        }
        Ok(self.donor_records.lock().unwrap().clone())
    }

    async fn find_inventory_levels(
        &self,
        owner_id: Uuid,
        types: &[BloodType],
    ) -> Result<Vec<InventoryLevel>> {
        self.inventory_calls.lock().unwrap().push(owner_id);
        Ok(self
            .inventory
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, level)| *id == owner_id && types.contains(&level.blood_type))
            .map(|(_, level)| level.clone())
            .collect())
    }

    async fn find_eligible_donors(
        &self,
        center: Location,
        radius_km: f64,
    ) -> Result<Vec<EligibleDonor>> {
        if *self.fail_donors.lock().unwrap() {
            anyhow::bail!("mock storage unavailable");
        }
        Ok(self
            .donors
            .lock()
            .unwrap()
            .iter()
            .filter(|d| crate::common::utils::geo::distance_km(center, d.location) <= radius_km)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Mock Place Lookup
// =============================================================================

pub struct MockPlaceLookup {
    places: Mutex<Vec<PlaceHit>>,
    fail: Mutex<bool>,
    search_calls: Arc<Mutex<Vec<(Location, f64)>>>,
}

impl MockPlaceLookup {
    pub fn new() -> Self {
        Self {
            places: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
            search_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_place(self, name: &str, lat: f64, lng: f64, description: Option<&str>) -> Self {
        self.places.lock().unwrap().push(PlaceHit {
            name: name.to_string(),
            location: Location::new(lat, lng).unwrap(),
            description: description.map(|s| s.to_string()),
        });
        self
    }

    /// Simulate an unreachable/timed-out lookup service
    pub fn failing(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }

    pub fn search_calls(&self) -> Vec<(Location, f64)> {
        self.search_calls.lock().unwrap().clone()
    }
}

impl Default for MockPlaceLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePlaceLookup for MockPlaceLookup {
    async fn search_nearby(
        &self,
        center: Location,
        radius_km: f64,
        _keywords: &[String],
    ) -> Result<Vec<PlaceHit>> {
        self.search_calls.lock().unwrap().push((center, radius_km));
        if *self.fail.lock().unwrap() {
            anyhow::bail!("mock places lookup timed out");
        }
        Ok(self.places.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Push Delivery
// =============================================================================

pub struct MockPushDelivery {
    /// Token lists from each send_multicast call
    dispatches: Arc<Mutex<Vec<Vec<String>>>>,
    payloads: Arc<Mutex<Vec<PushPayload>>>,
    fail: Mutex<bool>,
    /// Tokens that should be reported as failed by the backend
    failing_tokens: Mutex<Vec<String>>,
}

impl MockPushDelivery {
    pub fn new() -> Self {
        Self {
            dispatches: Arc::new(Mutex::new(Vec::new())),
            payloads: Arc::new(Mutex::new(Vec::new())),
            fail: Mutex::new(false),
            failing_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Simulate an unreachable delivery backend
    pub fn failing(self) -> Self {
        *self.fail.lock().unwrap() = true;
        self
    }

    /// Report the given token as undeliverable in the per-token breakdown
    pub fn with_failing_token(self, token: &str) -> Self {
        self.failing_tokens.lock().unwrap().push(token.to_string());
        self
    }

    pub fn dispatch_calls(&self) -> Vec<Vec<String>> {
        self.dispatches.lock().unwrap().clone()
    }

    pub fn sent_payloads(&self) -> Vec<PushPayload> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn was_called(&self) -> bool {
        !self.dispatches.lock().unwrap().is_empty()
    }
}

impl Default for MockPushDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePushDelivery for MockPushDelivery {
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> Result<PushDispatch> {
        self.dispatches.lock().unwrap().push(tokens.to_vec());
        self.payloads.lock().unwrap().push(payload.clone());

        if *self.fail.lock().unwrap() {
            anyhow::bail!("mock push backend unreachable");
        }

        let failing = self.failing_tokens.lock().unwrap().clone();
        let mut dispatch = PushDispatch::default();
        for token in tokens {
            let delivered = !failing.contains(token);
            if delivered {
                dispatch.success_count += 1;
            } else {
                dispatch.failure_count += 1;
            }
            dispatch.outcomes.push(TokenOutcome {
                token: token.clone(),
                delivered,
                error: (!delivered).then(|| "DeviceNotRegistered".to_string()),
            });
        }
        Ok(dispatch)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// ServerDeps wired with the given mocks and default matching config
pub fn test_deps(
    store: Arc<MockBloodStore>,
    places: Arc<MockPlaceLookup>,
    push: Arc<MockPushDelivery>,
) -> ServerDeps {
    ServerDeps::new(store, places, push, MatchingConfig::default())
}
