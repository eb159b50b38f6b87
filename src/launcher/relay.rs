//! Foreground runner: starts the server and shuttles bytes between our stdio and its pipes.
//!
//! Frames are never inspected; the editor on the other side of our stdio is the
//! protocol client.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::launcher::executable::ServerExecutable;

/// Spawns the server and relays until it exits. Returns the server's exit code.
pub async fn run(executable: &ServerExecutable) -> Result<i32, Error> {
    relay(executable, tokio::io::stdin(), tokio::io::stdout()).await
}

pub async fn relay<R, W>(executable: &ServerExecutable, input: R, output: W) -> Result<i32, Error>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    info!(
        command = %executable.command,
        classpath = ?executable.classpath(),
        "Starting language server"
    );

    let mut child = executable.to_command().spawn().inspect_err(|e| {
        warn!("Failed to start {}: {}", executable.command, e);
    })?;

    let child_stdin = child.stdin.take();
    let child_stdout = child.stdout.take();

    let to_server = child_stdin.map(|stdin| tokio::spawn(pump(input, stdin, "client -> server")));
    let to_client = child_stdout.map(|stdout| tokio::spawn(pump(stdout, output, "server -> client")));

    let status = child.wait().await?;
    info!("Language server exited with {}", status);

    // The editor side may still hold stdin open; the server is gone so stop forwarding.
    if let Some(task) = to_server {
        task.abort();
    }
    if let Some(task) = to_client
        && let Err(e) = task.await
    {
        warn!("server -> client relay task failed: {}", e);
    }

    Ok(status.code().unwrap_or(1))
}

async fn pump<R, W>(mut reader: R, mut writer: W, direction: &'static str)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match tokio::io::copy(&mut reader, &mut writer).await {
        Ok(bytes) => debug!("{} closed after {} bytes", direction, bytes),
        Err(e) => warn!("{} failed: {}", direction, e),
    }
    let _ = writer.shutdown().await;
}
