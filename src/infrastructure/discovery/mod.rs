//! Command discovery
//!
//! Each command may ship a YAML descriptor in the command directory declaring
//! its name, category, order and description. The scanner only reads these
//! files; it never runs command code.

pub mod descriptor;
pub mod scanner;

pub use descriptor::CommandDescriptor;
pub use scanner::DiscoveryScanner;
