//! Row structs for the tables this crate owns.
//!
//! Each submodule holds the `FromRow` struct matching a table row and the
//! conversions to and from the `reckoner_core` domain types.

pub mod annotation;
pub mod feature_flag;
