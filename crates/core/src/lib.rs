#![forbid(unsafe_code)]

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod model;
pub mod recalibrate;
pub mod selector;
pub mod time;

pub use catalog::{CatalogError, ProblemCatalog};
pub use error::Error;
pub use time::Clock;
