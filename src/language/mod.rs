//! Editor language layer
//! - indentation.rs: indentation and enter-key rules

pub mod indentation;

pub use indentation::{IndentAction, IndentRules, LanguageConfiguration, indentation_rules};

/// Language identifiers served by the XML language server
pub const LANGUAGE_IDS: [&str; 2] = ["xml", "xsl"];
