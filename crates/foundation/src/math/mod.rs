pub mod coordinate;
pub mod projection;

pub use coordinate::*;
pub use projection::*;
