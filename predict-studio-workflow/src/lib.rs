pub mod analysis;
pub mod prediction;
pub mod session;
pub mod status;
pub mod tabs;
pub mod training;
pub mod upload;

pub use analysis::*;
pub use prediction::*;
pub use session::*;
pub use status::*;
pub use tabs::*;
pub use training::*;
pub use upload::*;
