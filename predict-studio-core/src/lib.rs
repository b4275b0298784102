pub mod domain;
pub mod error;
pub mod schema;
pub mod state;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use schema::*;
pub use state::*;
pub use traits::*;
