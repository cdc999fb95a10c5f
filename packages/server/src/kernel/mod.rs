//! Infrastructure layer: collaborator traits, production clients, and the
//! dependency container injected into domain actions.

pub mod deps;
pub mod places_client;
pub mod postgres_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{NoopPushDelivery, ServerDeps};
pub use places_client::NominatimPlacesClient;
pub use postgres_store::PostgresBloodStore;
pub use traits::*;
