//! Cineref-Common: Shared types, identifiers, and errors.
//!
//! This crate provides the vocabulary used across cineref:
//!
//! - **Typed IDs**: [`UserId`] naming the acting user of a request
//! - **Core Types**: [`ReferenceKind`] for the catalog entity categories
//! - **Error Handling**: [`Error`] and the [`Result`] alias
//!
//! # Examples
//!
//! ```
//! use cineref_common::{Error, ReferenceKind, Result, UserId};
//!
//! let user = UserId::new("alice");
//! assert_eq!(user.as_str(), "alice");
//!
//! assert_eq!(ReferenceKind::Series.path_segment(), "tv");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("movie", 42))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
