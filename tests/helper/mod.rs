//! Test doubles for the host and the language client

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{Location, ReferenceParams, TextDocumentIdentifier, Url};

use xml_client::Error;
use xml_client::host::{Host, MessageChannel};
use xml_client::language::LanguageConfiguration;
use xml_client::launcher::ServerExecutable;
use xml_client::lsp::client::{ClientOptions, LanguageClient};

/// Records everything the extension asks of the editor and answers prompts from a queue
#[derive(Default)]
pub struct RecordingHost {
    pub settings: HashMap<String, Value>,
    pub selections: Mutex<VecDeque<Option<String>>>,
    pub language_configurations: Mutex<Vec<(String, LanguageConfiguration)>>,
    pub messages: Mutex<Vec<(MessageChannel, String, Vec<String>)>>,
    pub executed: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setting(mut self, key: &str, value: Value) -> Self {
        self.settings.insert(key.to_string(), value);
        self
    }

    pub fn with_selection(self, selection: Option<&str>) -> Self {
        self.selections
            .lock()
            .unwrap()
            .push_back(selection.map(str::to_string));
        self
    }

    pub fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(MessageChannel, String, Vec<String>)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Host for RecordingHost {
    fn configuration(&self, key: &str) -> Option<Value> {
        self.settings.get(key).cloned()
    }

    fn set_language_configuration(&self, language_id: &str, configuration: LanguageConfiguration) {
        self.language_configurations
            .lock()
            .unwrap()
            .push((language_id.to_string(), configuration));
    }

    async fn open_text_document(&self, uri: &Url) -> Result<TextDocumentIdentifier, Error> {
        Ok(TextDocumentIdentifier::new(uri.clone()))
    }

    async fn show_message(
        &self,
        channel: MessageChannel,
        message: &str,
        items: Vec<String>,
    ) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .push((channel, message.to_string(), items));
        self.selections.lock().unwrap().pop_front().flatten()
    }

    async fn execute_command(
        &self,
        command: &str,
        arguments: Vec<Value>,
    ) -> Result<Option<Value>, Error> {
        self.executed
            .lock()
            .unwrap()
            .push((command.to_string(), arguments));
        Ok(None)
    }
}

/// Language client that never spawns anything and answers references from a fixed list
#[derive(Default)]
pub struct FakeClient {
    pub started_with: Mutex<Option<(ServerExecutable, ClientOptions)>>,
    pub locations: Vec<Location>,
    pub requests: Mutex<Vec<ReferenceParams>>,
}

impl FakeClient {
    pub fn with_locations(locations: Vec<Location>) -> Self {
        Self {
            locations,
            ..Default::default()
        }
    }

    pub fn started_with(&self) -> Option<(ServerExecutable, ClientOptions)> {
        self.started_with.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageClient for FakeClient {
    async fn start(
        &self,
        server: ServerExecutable,
        options: ClientOptions,
    ) -> Result<(), jsonrpc::Error> {
        *self.started_with.lock().unwrap() = Some((server, options));
        Ok(())
    }

    async fn references(
        &self,
        params: ReferenceParams,
    ) -> Result<Option<Vec<Location>>, jsonrpc::Error> {
        self.requests.lock().unwrap().push(params);
        Ok(Some(self.locations.clone()))
    }
}
