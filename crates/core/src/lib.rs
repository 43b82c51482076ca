pub mod domain;
pub mod error;
pub mod repo;
pub mod store;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
