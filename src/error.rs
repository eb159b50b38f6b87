use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Language client request failed: {0}")]
    Client(#[from] tower_lsp::jsonrpc::Error),

    #[error("Host request failed: {0}")]
    Host(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments for {command}: {reason}")]
    InvalidArguments {
        command: &'static str,
        reason: String,
    },

    #[error("Invalid document URI {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Malformed {method} notification: {source}")]
    InvalidNotification {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize command arguments: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to read settings from {path:?}: {reason}")]
    Settings { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
