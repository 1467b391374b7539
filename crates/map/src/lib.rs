pub mod object;
pub mod viewport;

pub use object::*;
pub use viewport::*;
