//! Language client seam
//!
//! Framing, request correlation and capability negotiation belong to the client
//! library behind this trait; this crate only starts it and sends the requests it needs.

use async_trait::async_trait;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{DocumentFilter, Location, ReferenceParams};

use crate::language::LANGUAGE_IDS;
use crate::launcher::ServerExecutable;

pub const CLIENT_ID: &str = "xml";
pub const CLIENT_NAME: &str = "XML Support";

/// URI schemes of documents the client attaches to: saved files and unsaved buffers
const SCHEMES: [&str; 2] = ["file", "untitled"];

#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    pub id: String,
    pub name: String,
    pub document_selector: Vec<DocumentFilter>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            id: CLIENT_ID.to_string(),
            name: CLIENT_NAME.to_string(),
            document_selector: document_selector(),
        }
    }
}

/// One filter per scheme and language
pub fn document_selector() -> Vec<DocumentFilter> {
    SCHEMES
        .iter()
        .flat_map(|scheme| {
            LANGUAGE_IDS.iter().map(move |language| DocumentFilter {
                language: Some(language.to_string()),
                scheme: Some(scheme.to_string()),
                pattern: None,
            })
        })
        .collect()
}

/// Protocol client connected to the server process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageClient: Send + Sync {
    /// Spawns the server and completes once the initialize handshake is done
    async fn start(
        &self,
        server: ServerExecutable,
        options: ClientOptions,
    ) -> Result<(), jsonrpc::Error>;

    /// Sends `textDocument/references`
    async fn references(
        &self,
        params: ReferenceParams,
    ) -> Result<Option<Vec<Location>>, jsonrpc::Error>;
}
