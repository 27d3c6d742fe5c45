//! # OneBun Domain Layer
//!
//! Pure types shared by every other OneBun crate: the error taxonomy,
//! configuration value objects and the declarative route records produced by
//! controller decorators.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Fatal and soft composition errors |
//! | [`constants`] | Metadata keys and framework-reserved names |
//! | [`value_objects`] | Configuration and route/param metadata |

pub mod constants;
pub mod error;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::*;
