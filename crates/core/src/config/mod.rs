//! Configuration loading and schema definitions
//!
//! Settings shared by every binding family.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
