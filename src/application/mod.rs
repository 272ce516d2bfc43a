//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Registry loading, dispatching, help, the message loop
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod errors;
pub mod messaging;
pub mod services;
