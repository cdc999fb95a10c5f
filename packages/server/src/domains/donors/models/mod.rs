mod donor;

pub use donor::*;
