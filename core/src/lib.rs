//! Mark Core Types
//!
//! This crate provides the foundational types shared by every layer:
//! - Identity type for markers (MarkerKey)
//! - Scalar attribute values (the Value enum) and attribute maps
//! - The stored Marker record
//! - Store error types

mod entity;
mod error;
mod id;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use value::*;
