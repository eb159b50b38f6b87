//! Launch descriptor for the LemMinX language server

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::{Serialize, Serializer};
use tokio::process::Command;

/// Java runtime used to start the server
pub const JAVA_COMMAND: &str = "java";

/// Directory inside the extension that holds the bundled server
pub const SERVER_DIR: &str = "server";

/// File name of the bundled server jar
pub const SERVER_JAR: &str = "org.eclipse.lemminx-uber.jar";

/// Entry point class of the server
pub const MAIN_CLASS: &str = "org.eclipse.lemminx.XMLServerLauncher";

/// Heap and GC tuning passed ahead of the classpath
const JVM_FLAGS: [&str; 3] = ["-Xmx64M", "-XX:+UseG1GC", "-XX:+UseStringDeduplication"];

/// How the server's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Bidirectional pipe owned by the language client
    Pipe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutableOptions {
    /// Environment handed to the child. Kept as raw OS strings; only the JSON
    /// form drops entries that are not valid UTF-8.
    #[serde(serialize_with = "serialize_env")]
    pub env: BTreeMap<OsString, OsString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    pub stdio: StdioMode,
}

/// Everything needed to start the server process.
///
/// Built once per activation and handed to the language client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerExecutable {
    pub command: String,
    pub args: Vec<String>,
    pub options: ExecutableOptions,
}

impl ServerExecutable {
    /// Builds the descriptor from the current process environment.
    ///
    /// `server_path` overrides the bundled jar verbatim; it is not validated, so a
    /// bad path only shows up when the process fails to start.
    pub fn new(extension_path: &Path, server_path: Option<&str>) -> Self {
        Self::with_env(extension_path, server_path, std::env::vars_os().collect())
    }

    pub fn with_env(
        extension_path: &Path,
        server_path: Option<&str>,
        env: BTreeMap<OsString, OsString>,
    ) -> Self {
        let classpath = match server_path {
            Some(path) => path.to_string(),
            None => default_server_path(extension_path)
                .to_string_lossy()
                .into_owned(),
        };

        let mut args: Vec<String> = JVM_FLAGS.iter().map(|flag| flag.to_string()).collect();
        args.push("-cp".to_string());
        args.push(classpath);
        args.push(MAIN_CLASS.to_string());

        Self {
            command: JAVA_COMMAND.to_string(),
            args,
            options: ExecutableOptions {
                env,
                cwd: None,
                stdio: StdioMode::Pipe,
            },
        }
    }

    /// Returns the classpath argument, i.e. the jar the server is loaded from
    pub fn classpath(&self) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == "-cp")
            .and_then(|index| self.args.get(index + 1))
            .map(|s| s.as_str())
    }

    /// Converts the descriptor into a process command ready to spawn.
    ///
    /// The child sees exactly the captured environment and is killed when the
    /// handle is dropped.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .env_clear()
            .envs(&self.options.env)
            .kill_on_drop(true);

        if let Some(cwd) = &self.options.cwd {
            command.current_dir(cwd);
        }

        match self.options.stdio {
            StdioMode::Pipe => {
                command
                    .stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit());
            }
        }

        command
    }
}

fn serialize_env<S>(env: &BTreeMap<OsString, OsString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        env.iter()
            .filter_map(|(key, value)| Some((key.to_str()?, value.to_str()?))),
    )
}

/// Location of the jar bundled with the extension
pub fn default_server_path(extension_path: &Path) -> PathBuf {
    extension_path.join(SERVER_DIR).join(SERVER_JAR)
}
