//! Server process layer
//! - executable.rs: launch descriptor for the LemMinX server
//! - relay.rs: foreground runner used by the CLI

pub mod executable;
pub mod relay;

pub use executable::{ExecutableOptions, ServerExecutable, StdioMode};
