pub mod expo;
pub mod geo;
