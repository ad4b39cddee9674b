//! # View Model
//!
//! Clean DTOs that define the renderer-facing graph snapshot.
//! These types cross every boundary: source ↔ builder ↔ renderer ↔ user.
//!
//! Design rule: NO driver types, NO widget types here.
//! This module is pure data — no I/O, no state, no async.

pub mod entity;
pub mod relationship;
pub mod value;
pub mod property_map;

pub use entity::{ElementId, Entity};
pub use relationship::Relationship;
pub use value::Value;
pub use property_map::{PropertyMap, property_map};
