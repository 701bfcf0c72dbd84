//! MCP server implementation

use anyhow::Result;
use obsidian_core::config::ResolvedConfig;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::tools;

pub struct McpServer<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> McpServer<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.run_with(reader, writer).await
    }

    /// Serve newline-delimited requests from `reader`, one at a time.
    pub async fn run_with<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(vault = %self.config.vault_root.display(), "protocol server started");
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "unparseable request");
                    let response =
                        JsonRpcResponse::error(None, PARSE_ERROR, &format!("Parse error: {e}"));
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            if let Some(response) = self.handle_request(&request).await {
                write_response(&mut writer, &response).await?;
            }
        }

        info!("protocol server stopped");
        Ok(())
    }

    /// Answer one request. Notifications get no reply.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "request");

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id.clone(),
                INVALID_REQUEST,
                &format!("Invalid Request: unsupported jsonrpc version '{}'", request.jsonrpc),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "notifications/initialized" => return None,
            "ping" => JsonRpcResponse::success(request.id.clone(), serde_json::json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id.clone(),
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        if request.is_notification() {
            return None;
        }
        Some(response)
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "obsidian-cli",
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        JsonRpcResponse::success(request.id.clone(), result)
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id.clone(),
            serde_json::json!({ "tools": tools::definitions() }),
        )
    }

    fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let Some(name) = request.params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(
                request.id.clone(),
                INVALID_PARAMS,
                "Invalid params: missing tool name",
            );
        };

        let arguments = request.params.get("arguments").cloned().unwrap_or(serde_json::json!({}));
        let config = self.config;

        let result = match name {
            "list_notes" => tools::handle_list_notes(config),
            "find_notes" => tools::handle_find_notes(config, &arguments),
            "query_notes" => tools::handle_query_notes(config, &arguments),
            "get_note_content" => tools::handle_get_note_content(config, &arguments),
            "create_note" => tools::handle_create_note(config, &arguments),
            "get_vault_info" => tools::handle_get_vault_info(config),
            _ => {
                return JsonRpcResponse::error(
                    request.id.clone(),
                    INVALID_PARAMS,
                    &format!("Invalid params: unknown tool '{name}'"),
                );
            }
        };

        let tool_result = result.unwrap_or_else(|e| {
            debug!(tool = name, error = %e, "tool failed");
            ToolResult::error(format!("Error: {e:#}"))
        });

        match serde_json::to_value(&tool_result) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                INTERNAL_ERROR,
                &format!("Internal error: {e}"),
            ),
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let json = serde_json::to_string(response)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub async fn start_server(config: &ResolvedConfig) -> Result<()> {
    McpServer::new(config).run().await
}
