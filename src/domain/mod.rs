//! Domain layer - Core business objects and the abstractions around them
//!
//! This layer contains:
//! - Entities: Commands, the metadata catalog, messages, users
//! - Traits: Abstractions for infrastructure (Bot)

pub mod entities;
pub mod traits;
