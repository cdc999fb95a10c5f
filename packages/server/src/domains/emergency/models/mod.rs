mod candidate;
mod request;

pub use candidate::*;
pub use request::*;
