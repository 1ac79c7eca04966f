mod types;

pub use types::{PlacementError, Result};
