pub use num_traits::{Num, One, Zero};

/// Element types a domain buffer can hold.
pub trait NumTrait: Num + Copy + Send + Sync + 'static {}
impl<T: Num + Copy + Send + Sync + 'static> NumTrait for T {}

pub mod indexing;
mod region;
pub use region::*;

pub type Coord<const GRID_DIMENSION: usize> = nalgebra::SVector<i32, { GRID_DIMENSION }>;
