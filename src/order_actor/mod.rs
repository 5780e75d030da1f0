//! Order-specific domain logic: the status transition guard and entity hooks.

pub mod entity;
pub mod error;
mod status;

pub use error::*;
pub use status::*;
