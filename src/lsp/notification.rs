//! `xml/actionableNotification`: server messages that offer follow-up commands

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{Command, MessageType};
use tracing::{debug, warn};

use crate::error::Error;
use crate::host::{Host, MessageChannel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionableMessage {
    pub severity: MessageType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<Command>>,
}

pub enum ActionableNotification {}

impl Notification for ActionableNotification {
    type Params = ActionableMessage;
    const METHOD: &'static str = "xml/actionableNotification";
}

/// Configuration scope a settings change targets.
///
/// Part of the server's settings vocabulary; nothing in the client reads it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationScope {
    Default,
    Global,
    Workspace,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeInfo {
    pub scope: ConfigurationScope,
    pub configuration_target: bool,
}

impl MessageChannel {
    /// Channel for a protocol severity. `Log` and unknown values have none.
    pub fn from_severity(severity: MessageType) -> Option<Self> {
        match severity {
            MessageType::INFO => Some(Self::Information),
            MessageType::WARNING => Some(Self::Warning),
            MessageType::ERROR => Some(Self::Error),
            _ => None,
        }
    }
}

/// Shows actionable notifications through the host and runs the picked command
pub struct NotificationBridge {
    host: Arc<dyn Host>,
}

impl NotificationBridge {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    /// Decodes a raw `xml/actionableNotification` payload and handles it
    pub async fn dispatch(&self, params: Value) -> Result<(), Error> {
        let message: ActionableMessage =
            serde_json::from_value(params).map_err(|source| Error::InvalidNotification {
                method: ActionableNotification::METHOD,
                source,
            })?;
        self.handle(message).await
    }

    pub async fn handle(&self, notification: ActionableMessage) -> Result<(), Error> {
        let Some(channel) = MessageChannel::from_severity(notification.severity) else {
            return Ok(());
        };

        let commands = notification.commands.unwrap_or_default();
        let titles: Vec<String> = commands.iter().map(|c| c.title.clone()).collect();

        let Some(selection) = self
            .host
            .show_message(channel, &notification.message, titles)
            .await
        else {
            return Ok(());
        };

        // First command with a matching title wins
        let Some(action) = commands.into_iter().find(|c| c.title == selection) else {
            debug!("No command titled {:?}", selection);
            return Ok(());
        };

        let arguments = action.arguments.unwrap_or_default();
        self.host
            .execute_command(&action.command, arguments)
            .await
            .inspect_err(|e| warn!("Command {} failed: {}", action.command, e))?;
        Ok(())
    }
}
