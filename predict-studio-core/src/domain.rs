pub mod column;
pub mod dataset;
pub mod model;
pub mod training;
pub mod prediction;

pub use column::*;
pub use dataset::*;
pub use model::*;
pub use training::*;
pub use prediction::*;
