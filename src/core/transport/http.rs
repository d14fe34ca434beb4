//! HTTP transport implementation.
//!
//! Stateless JSON-RPC 2.0 over POST, for clients such as curl or a browser.
//! Each request is dispatched directly to the server's HTTP helpers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::ServerHandler;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::service::shutdown_signal;
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

pub struct HttpTransport {
    config: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,

    /// Absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl JsonRpcResponse {
    fn from_outcome(id: Option<Value>, outcome: Result<Value, JsonRpcError>) -> Self {
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
            error,
        }
    }
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    fn router(&self, server: McpServer) -> Router {
        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .with_state(server)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            app
        }
    }

    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.config.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Ready - listening on {} (POST {}, GET /health, CORS {})",
            addr,
            self.config.rpc_path,
            if self.config.enable_cors { "on" } else { "off" }
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::Http(e.to_string()))
    }
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(server): State<McpServer>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", request.method.as_str());

    // Notifications carry no id and get no body back.
    if request.id.is_none() && request.method.starts_with("notifications/") {
        debug!("Notification received");
        return StatusCode::ACCEPTED.into_response();
    }

    let response = process_request(&server, request).await;
    (StatusCode::OK, Json(response)).into_response()
}

async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let outcome = if request.jsonrpc != "2.0" {
        Err(JsonRpcError::new(INVALID_REQUEST, "Invalid Request"))
    } else {
        dispatch(server, &request.method, request.params.unwrap_or(Value::Null)).await
    };
    JsonRpcResponse::from_outcome(request.id, outcome)
}

async fn dispatch(server: &McpServer, method: &str, params: Value) -> Result<Value, JsonRpcError> {
    debug!("Dispatching {}", method);
    match method {
        "initialize" => serde_json::to_value(server.get_info())
            .map_err(|e| JsonRpcError::new(-32603, e.to_string())),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": server.list_tools() })),
        "tools/call" => {
            let name = required_str(&params, "name")?;
            let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
            server
                .call_tool(name, arguments)
                .await
                .map_err(JsonRpcError::invalid_params)
        }
        "resources/list" => Ok(json!({ "resources": server.list_resources().await })),
        "resources/templates/list" => Ok(json!({
            "resourceTemplates": server.list_resource_templates().await
        })),
        "resources/read" => {
            let uri = required_str(&params, "uri")?;
            server
                .read_resource(uri)
                .await
                .map_err(JsonRpcError::invalid_params)
        }
        "prompts/list" => Ok(json!({ "prompts": server.list_prompts().await })),
        "prompts/get" => {
            let name = required_str(&params, "name")?;
            server
                .get_prompt(name, params.get("arguments").cloned())
                .await
                .map_err(JsonRpcError::invalid_params)
        }
        m if m.starts_with("notifications/") => Ok(Value::Null),
        other => {
            warn!("Unknown method: {}", other);
            Err(JsonRpcError::new(METHOD_NOT_FOUND, "Method not found"))
        }
    }
}

fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, JsonRpcError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing '{key}' parameter")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ServerConfig;
    use crate::core::security::{PathGuard, RootSet};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, McpServer, String) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("shared");
        fs::create_dir(&root).unwrap();
        let root = root.canonicalize().unwrap();
        let guard = PathGuard::new(
            RootSet::new([&root], None, temp.path()),
            None,
            temp.path().to_path_buf(),
        );
        let server = ServerConfig {
            name: "http-test".to_string(),
            version: "0.0.1".to_string(),
        };
        (
            temp,
            McpServer::with_guard(server, guard),
            root.display().to_string(),
        )
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[tokio::test]
    async fn test_initialize_reports_server_name() {
        let (_temp, server, _) = setup();
        let response = process_request(&server, request("initialize", json!({}))).await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "http-test");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_write_then_read() {
        let (_temp, server, root) = setup();
        let path = format!("{root}/hello.txt");

        let write = process_request(
            &server,
            request(
                "tools/call",
                json!({ "name": "write_file", "arguments": { "path": path, "content": "hello" } }),
            ),
        )
        .await;
        assert!(write.error.is_none());

        let read = process_request(
            &server,
            request(
                "tools/call",
                json!({ "name": "read_file", "arguments": { "path": path } }),
            ),
        )
        .await;
        assert_eq!(read.result.unwrap()["content"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn test_tools_call_outside_roots_is_tool_error() {
        let (temp, server, _) = setup();
        let path = temp.path().join("escape.txt").display().to_string();

        let response = process_request(
            &server,
            request(
                "tools/call",
                json!({ "name": "read_file", "arguments": { "path": path } }),
            ),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(
            result["content"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("Error: Path '")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let (_temp, server, _) = setup();
        let response = process_request(
            &server,
            request("tools/call", json!({ "name": "delete_everything" })),
        )
        .await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_missing_parameter() {
        let (_temp, server, _) = setup();
        let response = process_request(&server, request("resources/read", json!({}))).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Missing 'uri' parameter");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (_temp, server, _) = setup();
        let response = process_request(&server, request("files/delete", json!({}))).await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let (_temp, server, _) = setup();
        let mut bad = request("ping", json!({}));
        bad.jsonrpc = "1.0".to_string();
        let response = process_request(&server, bad).await;
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_prompts_get() {
        let (_temp, server, _) = setup();
        let response = process_request(
            &server,
            request(
                "prompts/get",
                json!({ "name": "organize_files", "arguments": { "directory": "/x" } }),
            ),
        )
        .await;
        assert_eq!(response.result.unwrap()["messages"][0]["role"], "user");
    }
}
