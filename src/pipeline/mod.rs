//! Pipeline module - loading, derived features and summary statistics

pub mod correlation;
pub mod derive;
pub mod loader;
pub mod schema;
pub mod summary;

pub use correlation::*;
pub use derive::*;
pub use loader::*;
pub use schema::*;
pub use summary::*;
