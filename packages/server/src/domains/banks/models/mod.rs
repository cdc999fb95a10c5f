mod bank;
mod inventory;

pub use bank::*;
pub use inventory::*;
