//! Activation: wires the host, the language client and the XML language features together

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tower_lsp::lsp_types::notification::Notification;
use tracing::{debug, info};

use crate::config::{SERVER_PATH_SETTING, Settings};
use crate::error::Error;
use crate::host::Host;
use crate::language::{LANGUAGE_IDS, indentation_rules};
use crate::launcher::ServerExecutable;
use crate::lsp::client::{ClientOptions, LanguageClient};
use crate::lsp::commands::{CommandRegistry, register_commands};
use crate::lsp::notification::{ActionableNotification, NotificationBridge};

#[derive(Debug, Clone)]
pub struct ExtensionContext {
    /// Directory the extension is installed in; the bundled server lives below it
    pub extension_path: PathBuf,
}

/// An activated extension. The host routes command invocations and server
/// notifications into it.
pub struct XmlExtension {
    commands: CommandRegistry,
    notifications: NotificationBridge,
}

impl XmlExtension {
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub async fn execute_command(
        &self,
        command: &str,
        arguments: Vec<Value>,
    ) -> Result<Option<Value>, Error> {
        self.commands.execute(command, arguments).await
    }

    /// Handles a server-to-client notification. Methods other than
    /// `xml/actionableNotification` are not ours and are ignored.
    pub async fn handle_notification(&self, method: &str, params: Value) -> Result<(), Error> {
        if method != ActionableNotification::METHOD {
            debug!("Ignoring notification {}", method);
            return Ok(());
        }
        self.notifications.dispatch(params).await
    }
}

/// Installs the indentation rules, starts the client and registers the commands.
///
/// Indentation rules are in place even if the server fails to start; the start
/// error itself is returned to the host.
pub async fn activate(
    host: Arc<dyn Host>,
    client: Arc<dyn LanguageClient>,
    context: &ExtensionContext,
) -> Result<XmlExtension, Error> {
    for language_id in LANGUAGE_IDS {
        host.set_language_configuration(language_id, indentation_rules());
    }

    let settings = Settings::from_server_path_value(host.configuration(SERVER_PATH_SETTING));
    let executable = ServerExecutable::new(
        &context.extension_path,
        settings.language_server_path.as_deref(),
    );
    info!("Starting XML language client with {:?}", executable.classpath());

    client.start(executable, ClientOptions::default()).await?;
    info!("XML language client ready");

    let mut commands = CommandRegistry::new();
    register_commands(&mut commands, host.clone(), client);

    Ok(XmlExtension {
        commands,
        notifications: NotificationBridge::new(host),
    })
}
