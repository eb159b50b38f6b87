use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use xml_client::config::{self, Settings};
use xml_client::language::indentation_rules;
use xml_client::launcher::{ServerExecutable, relay};

#[derive(Debug, Parser)]
#[command(name = "xml-client", version, about = "Launch helper for the LemMinX XML language server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the server launch descriptor as JSON
    Command(LaunchArgs),
    /// Print the indentation rules for xml/xsl as JSON
    LanguageConfiguration,
    /// Start the server and relay stdin/stdout to it
    Run(LaunchArgs),
}

#[derive(Debug, Args)]
struct LaunchArgs {
    /// Directory containing server/org.eclipse.lemminx-uber.jar
    #[arg(long)]
    extension_path: Option<PathBuf>,
    /// Server jar to use instead of the bundled one
    #[arg(long)]
    server_path: Option<String>,
    /// JSON settings file to read xml.laguageServerPath from
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl LaunchArgs {
    fn executable(&self) -> anyhow::Result<ServerExecutable> {
        let extension_path = match &self.extension_path {
            Some(path) => path.clone(),
            None => default_extension_path()?,
        };

        let settings = match &self.settings {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        // An explicit flag wins over the settings file
        let server_path = self
            .server_path
            .clone()
            .or(settings.language_server_path);

        Ok(ServerExecutable::new(&extension_path, server_path.as_deref()))
    }
}

/// The directory holding this binary, mirroring how an installed extension ships the jar next to it
fn default_extension_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the xml-client binary")?;
    Ok(exe
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".")))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Command(args) => {
            let executable = args.executable()?;
            println!("{}", serde_json::to_string_pretty(&executable)?);
        }
        Commands::LanguageConfiguration => {
            println!("{}", serde_json::to_string_pretty(&indentation_rules())?);
        }
        Commands::Run(args) => {
            xml_client::log::init()?;
            info!("Logging to {:?}", config::log_path());
            let executable = args.executable()?;
            let code = relay::run(&executable).await?;
            info!("xml-client relay finished with {}", code);
            // A stdin read may still be parked on a blocking thread; don't wait for it.
            std::process::exit(code);
        }
    }

    Ok(())
}
