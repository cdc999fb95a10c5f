pub mod emergency;
pub mod health;

pub use emergency::{match_handler, notify_handler};
pub use health::health_handler;
