//! Editor host seam: everything the extension asks of the embedding editor

use async_trait::async_trait;
use serde_json::Value;
use tower_lsp::lsp_types::{TextDocumentIdentifier, Url};

use crate::error::Error;
use crate::language::LanguageConfiguration;

/// Where a server message is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageChannel {
    Information,
    Warning,
    Error,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Host: Send + Sync {
    /// Current value of a configuration key, if set
    fn configuration(&self, key: &str) -> Option<Value>;

    fn set_language_configuration(&self, language_id: &str, configuration: LanguageConfiguration);

    /// Loads the document so the server can be queried about it
    async fn open_text_document(&self, uri: &Url) -> Result<TextDocumentIdentifier, Error>;

    /// Shows `message` with `items` as choices. Resolves to the chosen item,
    /// or `None` when the prompt is dismissed.
    async fn show_message(
        &self,
        channel: MessageChannel,
        message: &str,
        items: Vec<String>,
    ) -> Option<String>;

    async fn execute_command(
        &self,
        command: &str,
        arguments: Vec<Value>,
    ) -> Result<Option<Value>, Error>;
}
