pub mod scorer;
pub mod weights;

pub use scorer::*;
pub use weights::*;
