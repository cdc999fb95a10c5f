//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. All external collaborators use trait abstractions to enable
//! testing.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::domains::emergency::models::MatchingConfig;
use crate::kernel::{BaseBloodStore, BasePlaceLookup, BasePushDelivery, PushDispatch, PushPayload};

// =============================================================================
// NoopPushDelivery (stub for unconfigured environments)
// =============================================================================

/// Push delivery stub used when no push backend is configured.
/// Always reports the zero result without attempting a dispatch.
pub struct NoopPushDelivery;

#[async_trait]
impl BasePushDelivery for NoopPushDelivery {
    async fn send_multicast(
        &self,
        tokens: &[String],
        _payload: &PushPayload,
    ) -> Result<PushDispatch> {
        tracing::warn!(
            token_count = tokens.len(),
            "Push delivery not configured; dropping multicast"
        );
        Ok(PushDispatch::default())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to domain actions
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseBloodStore>,
    pub places: Arc<dyn BasePlaceLookup>,
    pub push_service: Arc<dyn BasePushDelivery>,
    /// Tunables for aggregation, dedup, and ranking
    pub matching: MatchingConfig,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseBloodStore>,
        places: Arc<dyn BasePlaceLookup>,
        push_service: Arc<dyn BasePushDelivery>,
        matching: MatchingConfig,
    ) -> Self {
        Self {
            store,
            places,
            push_service,
            matching,
        }
    }
}
