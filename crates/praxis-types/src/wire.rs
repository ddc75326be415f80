// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Stream protocol identifiers and wire shapes (spec §6 "External
//! Interfaces").

use serde::{Deserialize, Serialize};

/// Native MCP — JSON objects, length-delimited by the JSON decoder.
pub const PROTOCOL_MCP: &str = "/praxis/mcp/1.0.0";
/// Card exchange — two sequential JSON objects, one each direction.
pub const PROTOCOL_CARD: &str = "/praxis/card/1.0.0";
/// Tool invocation — request JSON then response JSON.
pub const PROTOCOL_TOOL: &str = "/praxis/tool/1.0.0";
/// Agent-to-Agent — JSON-RPC 2.0 request/response pairs.
pub const PROTOCOL_A2A: &str = "/praxis/a2a/1.0.0";
/// A2A card exchange — request/response JSON, typed by a `type` field.
pub const PROTOCOL_A2A_CARD: &str = "/praxis/a2a.card/0.3.0";

/// JSON-RPC style error codes reserved by the spec.
pub const ERR_METHOD_NOT_FOUND: i64 = -32601;
pub const ERR_INVALID_PARAMS: i64 = -32602;
pub const ERR_INTERNAL: i64 = -32603;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolErrorShape {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolErrorShape>,
}

impl ToolResponse {
    pub fn ok(id: impl Into<String>, result: serde_json::Value) -> Self {
        ToolResponse {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        ToolResponse {
            id: id.into(),
            result: None,
            error: Some(ToolErrorShape {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Generic legacy MCP-style JSON-RPC-like envelope (`tools.list`,
/// `tool.invoke`) used on the Message/RPC protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolErrorShape>,
}

/// Strict JSON-RPC 2.0 request, used on `/praxis/a2a/1.0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    pub fn new(id: serde_json::Value, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn ok(id: serde_json::Value, result: serde_json::Value) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: serde_json::Value, code: i64, message: impl Into<String>) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Opaque A2A card: this layer does not interpret its contents, only stores
/// and forwards it verbatim (spec §4.6 item 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpaqueA2ACard {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub body: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_response_ok_has_no_error() {
        let resp = ToolResponse::ok("1", serde_json::json!({"a": 1}));
        assert!(resp.error.is_none());
        assert!(resp.result.is_some());
    }

    #[test]
    fn tool_response_err_has_no_result() {
        let resp = ToolResponse::err("1", ERR_INTERNAL, "boom");
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, ERR_INTERNAL);
    }

    #[test]
    fn json_rpc_request_defaults_to_version_two() {
        let req = JsonRpcRequest::new(serde_json::json!(1), "tools.list", None);
        assert_eq!(req.jsonrpc, "2.0");
    }

    #[test]
    fn protocol_identifiers_match_external_interface_table() {
        assert_eq!(PROTOCOL_MCP, "/praxis/mcp/1.0.0");
        assert_eq!(PROTOCOL_CARD, "/praxis/card/1.0.0");
        assert_eq!(PROTOCOL_TOOL, "/praxis/tool/1.0.0");
        assert_eq!(PROTOCOL_A2A, "/praxis/a2a/1.0.0");
        assert_eq!(PROTOCOL_A2A_CARD, "/praxis/a2a.card/0.3.0");
    }
}
