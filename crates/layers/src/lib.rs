pub mod attribution;
pub mod collection;
pub mod coverage;
pub mod layer;
pub mod store;
pub mod tile_grid;

pub use attribution::*;
pub use collection::*;
pub use coverage::*;
pub use layer::*;
pub use store::*;
pub use tile_grid::*;
