//! Newline-delimited JSON-RPC over stdin/stdout

use serde_json::Value;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::protocol::JsonRpcResponse;
use super::protocol::McpError;
use super::protocol::McpHandler;
use crate::errors::Result;

/// Serve MCP on the process's stdin/stdout until EOF
pub async fn serve_stdio(handler: McpHandler) -> Result<()> {
    info!("MCP stdio transport started");
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(&handler, stdin, stdout).await?;
    info!("MCP stdio transport finished");
    Ok(())
}

/// Answer each non-blank input line with one output line.
///
/// Notifications produce no output. Lines that are not valid UTF-8 get a
/// parse error reply; only I/O failures end the loop.
pub async fn serve_lines<R, W>(handler: &McpHandler, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match handler.handle(line).await.response() {
                    Some(response) => response.clone(),
                    None => {
                        debug!("No reply for notification");
                        continue;
                    }
                }
            }
            Err(e) => {
                warn!("Discarding non UTF-8 input line: {}", e);
                JsonRpcResponse::failure(Value::Null, &McpError::Parse)
            }
        };

        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
