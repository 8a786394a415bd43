//! CLI command implementations

pub mod explain;
pub mod resolve;

pub use explain::explain_command;
pub use resolve::resolve_command;
