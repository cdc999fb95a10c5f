//! Emergency blood-matching domain
//!
//! Aggregates candidate blood sources (trusted banks + external lookup),
//! ranks them by source, compatibility, and proximity, and fans out push
//! notifications to eligible donors nearby.

pub mod actions;
pub mod models;
