mod aggregate;
mod notify;
mod rank;

pub use aggregate::*;
pub use notify::*;
pub use rank::*;
