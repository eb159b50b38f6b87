//! Commands the extension contributes to the host

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tower_lsp::lsp_types::{
    PartialResultParams, Position, ReferenceContext, ReferenceParams, TextDocumentPositionParams,
    Url, WorkDoneProgressParams,
};
use tracing::{debug, info};

use crate::error::Error;
use crate::host::Host;
use crate::lsp::client::LanguageClient;

/// Shows references at a position through `textDocument/references`
pub const SHOW_REFERENCES: &str = "xml.show.references";
/// Opens the settings UI, optionally at one setting
pub const OPEN_SETTINGS: &str = "xml.open.settings";

/// Host command that renders a list of locations in the references view
pub const EDITOR_SHOW_REFERENCES: &str = "editor.action.showReferences";
/// Host command that opens the settings UI
pub const EDITOR_OPEN_SETTINGS: &str = "workbench.action.openSettings";

pub type CommandHandler =
    Box<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Option<Value>, Error>> + Send + Sync>;

/// Command identifiers mapped to their handlers; the host calls [`CommandRegistry::execute`]
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: &'static str, handler: CommandHandler) {
        debug!("Registering command {}", id);
        self.handlers.insert(id, handler);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Registered identifiers, sorted
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn execute(&self, id: &str, arguments: Vec<Value>) -> Result<Option<Value>, Error> {
        let handler = self
            .handlers
            .get(id)
            .ok_or_else(|| Error::UnknownCommand(id.to_string()))?;
        handler(arguments).await
    }
}

/// Registers [`SHOW_REFERENCES`] and [`OPEN_SETTINGS`]
pub fn register_commands(
    registry: &mut CommandRegistry,
    host: Arc<dyn Host>,
    client: Arc<dyn LanguageClient>,
) {
    let references_host = host.clone();
    registry.register(
        SHOW_REFERENCES,
        Box::new(move |arguments| {
            let host = references_host.clone();
            let client = client.clone();
            Box::pin(async move {
                let (uri, position) = show_references_arguments(arguments)?;
                show_references(host.as_ref(), client.as_ref(), &uri, position).await?;
                Ok(None)
            })
        }),
    );

    registry.register(
        OPEN_SETTINGS,
        Box::new(move |arguments| {
            let host = host.clone();
            Box::pin(async move {
                let setting_id = match arguments.into_iter().next() {
                    Some(Value::String(id)) => Some(id),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        return Err(Error::InvalidArguments {
                            command: OPEN_SETTINGS,
                            reason: format!("expected a setting id, got {}", other),
                        });
                    }
                };
                open_settings(host.as_ref(), setting_id).await
            })
        }),
    );
}

fn show_references_arguments(arguments: Vec<Value>) -> Result<(String, Position), Error> {
    let invalid = |reason: String| Error::InvalidArguments {
        command: SHOW_REFERENCES,
        reason,
    };

    let mut arguments = arguments.into_iter();
    let uri = match arguments.next() {
        Some(Value::String(uri)) => uri,
        other => return Err(invalid(format!("expected a document URI, got {:?}", other))),
    };
    let position = arguments
        .next()
        .ok_or_else(|| invalid("missing position".to_string()))
        .and_then(|value| {
            serde_json::from_value::<Position>(value).map_err(|e| invalid(e.to_string()))
        })?;

    Ok((uri, position))
}

/// Asks the server for references at `position` and hands them to the host's references view
pub async fn show_references(
    host: &dyn Host,
    client: &dyn LanguageClient,
    uri: &str,
    position: Position,
) -> Result<(), Error> {
    let uri = Url::parse(uri).map_err(|e| Error::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    let text_document = host.open_text_document(&uri).await?;
    let params = ReferenceParams {
        text_document_position: TextDocumentPositionParams {
            text_document,
            position,
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: ReferenceContext {
            include_declaration: true,
        },
    };

    let locations = client.references(params).await?.unwrap_or_default();
    info!("{} references for {} at {:?}", locations.len(), uri, position);

    host.execute_command(
        EDITOR_SHOW_REFERENCES,
        vec![
            Value::String(uri.to_string()),
            serde_json::to_value(position)?,
            serde_json::to_value(&locations)?,
        ],
    )
    .await?;
    Ok(())
}

/// Opens the host settings UI, focused on `setting_id` when given
pub async fn open_settings(
    host: &dyn Host,
    setting_id: Option<String>,
) -> Result<Option<Value>, Error> {
    let arguments = setting_id.map(Value::String).into_iter().collect();
    host.execute_command(EDITOR_OPEN_SETTINGS, arguments).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::lsp::client::MockLanguageClient;
    use mockall::predicate::eq;
    use serde_json::json;
    use tower_lsp::jsonrpc;
    use tower_lsp::lsp_types::{Location, Range, TextDocumentIdentifier};

    const DOC_URI: &str = "file:///work/pom.xml";

    fn location(line: u32) -> Location {
        Location {
            uri: Url::parse(DOC_URI).unwrap(),
            range: Range::new(Position::new(line, 4), Position::new(line, 9)),
        }
    }

    fn registry(host: MockHost, client: MockLanguageClient) -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_commands(&mut registry, Arc::new(host), Arc::new(client));
        registry
    }

    #[test]
    fn register_commands_adds_both_commands() {
        let registry = registry(MockHost::new(), MockLanguageClient::new());

        assert_eq!(registry.ids(), vec![OPEN_SETTINGS, SHOW_REFERENCES]);
    }

    #[tokio::test]
    async fn execute_rejects_unknown_command() {
        let registry = CommandRegistry::new();

        let result = registry.execute("xml.unknown", vec![]).await;

        assert!(matches!(result, Err(Error::UnknownCommand(id)) if id == "xml.unknown"));
    }

    #[tokio::test]
    async fn show_references_requests_locations_and_opens_references_view() {
        let mut host = MockHost::new();
        host.expect_open_text_document()
            .withf(|uri| uri.as_str() == DOC_URI)
            .times(1)
            .returning(|uri| Ok(TextDocumentIdentifier::new(uri.clone())));
        host.expect_execute_command()
            .withf(|command, arguments| {
                command == EDITOR_SHOW_REFERENCES
                    && arguments[0] == json!(DOC_URI)
                    && arguments[1] == json!({"line": 3, "character": 7})
                    && arguments[2].as_array().map(Vec::len) == Some(2)
            })
            .times(1)
            .returning(|_, _| Ok(None));

        let mut client = MockLanguageClient::new();
        client
            .expect_references()
            .withf(|params| {
                params.text_document_position.position == Position::new(3, 7)
                    && params.text_document_position.text_document.uri.as_str() == DOC_URI
            })
            .times(1)
            .returning(|_| Ok(Some(vec![location(1), location(8)])));

        let registry = registry(host, client);
        registry
            .execute(
                SHOW_REFERENCES,
                vec![json!(DOC_URI), json!({"line": 3, "character": 7})],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn show_references_forwards_empty_list_for_null_result() {
        let mut host = MockHost::new();
        host.expect_open_text_document()
            .returning(|uri| Ok(TextDocumentIdentifier::new(uri.clone())));
        host.expect_execute_command()
            .withf(|_, arguments| arguments[2] == json!([]))
            .times(1)
            .returning(|_, _| Ok(None));

        let mut client = MockLanguageClient::new();
        client.expect_references().returning(|_| Ok(None));

        show_references(&host, &client, DOC_URI, Position::new(0, 0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn show_references_propagates_document_resolution_failure() {
        let mut host = MockHost::new();
        host.expect_open_text_document()
            .returning(|_| Err(Error::Host("document not found".to_string())));
        host.expect_execute_command().never();

        let mut client = MockLanguageClient::new();
        client.expect_references().never();

        let result = show_references(&host, &client, DOC_URI, Position::new(0, 0)).await;

        assert!(matches!(result, Err(Error::Host(_))));
    }

    #[tokio::test]
    async fn show_references_propagates_request_failure() {
        let mut host = MockHost::new();
        host.expect_open_text_document()
            .returning(|uri| Ok(TextDocumentIdentifier::new(uri.clone())));
        host.expect_execute_command().never();

        let mut client = MockLanguageClient::new();
        client
            .expect_references()
            .returning(|_| Err(jsonrpc::Error::internal_error()));

        let result = show_references(&host, &client, DOC_URI, Position::new(0, 0)).await;

        assert!(matches!(result, Err(Error::Client(_))));
    }

    #[tokio::test]
    async fn show_references_rejects_invalid_uri() {
        let host = MockHost::new();
        let client = MockLanguageClient::new();

        let result = show_references(&host, &client, "not a uri", Position::new(0, 0)).await;

        assert!(matches!(result, Err(Error::InvalidUri { .. })));
    }

    #[tokio::test]
    async fn show_references_command_requires_position() {
        let registry = registry(MockHost::new(), MockLanguageClient::new());

        let result = registry.execute(SHOW_REFERENCES, vec![json!(DOC_URI)]).await;

        assert!(matches!(result, Err(Error::InvalidArguments { .. })));
    }

    #[tokio::test]
    async fn open_settings_forwards_setting_id() {
        let mut host = MockHost::new();
        host.expect_execute_command()
            .with(eq(EDITOR_OPEN_SETTINGS), eq(vec![json!("xml.catalogs")]))
            .times(1)
            .returning(|_, _| Ok(None));

        let registry = registry(host, MockLanguageClient::new());
        registry
            .execute(OPEN_SETTINGS, vec![json!("xml.catalogs")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn open_settings_without_id_passes_no_arguments() {
        let mut host = MockHost::new();
        host.expect_execute_command()
            .with(eq(EDITOR_OPEN_SETTINGS), eq(Vec::<Value>::new()))
            .times(1)
            .returning(|_, _| Ok(None));

        let registry = registry(host, MockLanguageClient::new());
        registry.execute(OPEN_SETTINGS, vec![]).await.unwrap();
    }
}
