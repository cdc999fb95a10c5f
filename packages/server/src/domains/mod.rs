// Business domains
pub mod banks;
pub mod compatibility;
pub mod donors;
pub mod emergency;
