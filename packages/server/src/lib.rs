// LifeLink Emergency Blood Matching - API Core
//
// This crate provides the backend API for matching emergency blood requests
// with nearby blood banks and donors, and for fanning out push notifications
// to eligible donors. External collaborators (storage, places lookup, push
// delivery) sit behind traits in the kernel so domains stay testable.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
