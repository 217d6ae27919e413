pub mod projection;
pub mod queries;
pub mod scope;
pub mod types;

pub use queries::*;
pub use types::*;
