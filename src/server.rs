//! Line-delimited JSON tool loop.
//!
//! Each input line is `{"tool": "<name>", "input": {...}}` and produces one
//! [`ToolResult`] JSON line. `{"tool": "list_tools"}` returns the schemas.
//! Requests are handled one at a time, in order.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ai_tools::{LocalFileTools, ToolResult};

#[derive(Debug, Deserialize)]
struct ToolRequest {
    tool: String,
    #[serde(default)]
    input: Value,
}

pub async fn serve<R, W>(
    tools: &LocalFileTools,
    reader: R,
    mut writer: W,
    shutdown: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Tool loop started");
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, stopping tool loop");
                break;
            }
            line = lines.next_line() => line.context("Failed to read request line")?,
        };

        let Some(line) = line else {
            debug!("Input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(tools, &line, shutdown.child_token()).await;
        let mut encoded = serde_json::to_string(&response).context("Failed to encode tool result")?;
        encoded.push('\n');
        writer
            .write_all(encoded.as_bytes())
            .await
            .context("Failed to write tool result")?;
        writer.flush().await.context("Failed to flush output")?;
    }

    info!("Tool loop stopped");
    Ok(())
}

async fn handle_line(tools: &LocalFileTools, line: &str, cancel: CancellationToken) -> ToolResult {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected malformed request: {}", e);
            return ToolResult::error(format!("Malformed request: {}", e));
        }
    };

    if request.tool == "list_tools" {
        return ToolResult::success(json!({
            "status": "success",
            "tools": LocalFileTools::get_tool_schemas()
        }));
    }

    let input = if request.input.is_null() { json!({}) } else { request.input };
    debug!("Executing tool {}", request.tool);
    tools
        .execute_tool_with_cancel(&request.tool, input, cancel)
        .await
        .unwrap_or_else(|e| ToolResult::error(format!("Tool execution failed: {:#}", e)))
}
