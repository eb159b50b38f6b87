//! Client-side glue for the LemMinX XML language server.
//!
//! - `launcher`: how the server process is started
//! - `lsp`: the language client seam, contributed commands and the actionable notification bridge
//! - `language`: indentation rules for `xml` and `xsl`
//! - `host`: what the embedding editor provides
//! - `extension`: activation

pub mod config;
pub mod error;
pub mod extension;
pub mod host;
pub mod language;
pub mod launcher;
pub mod log;
pub mod lsp;

pub use error::Error;
pub use extension::{ExtensionContext, XmlExtension, activate};
