//! Live session wire types
//!
//! Shapes of the messages exchanged with the remote agent. The envelope keys
//! are camelCase (`toolCall`, `functionCalls`); the result payload keys are
//! snake_case (`string_value`, `object_value`). Both are fixed by the remote
//! protocol.

use crate::checklist::Checklist;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single function call requested by the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl FunctionCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}

/// Batch of function calls from one `toolCall` message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

/// Result payload of a function response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseResult {
    String { string_value: String },
    Object { object_value: Vec<Checklist> },
}

impl ResponseResult {
    pub fn text(value: impl Into<String>) -> Self {
        ResponseResult::String {
            string_value: value.into(),
        }
    }

    pub fn lists(lists: Vec<Checklist>) -> Self {
        ResponseResult::Object {
            object_value: lists,
        }
    }

    #[cfg(test)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseResult::String { string_value } => Some(string_value),
            ResponseResult::Object { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub result: ResponseResult,
}

/// Acknowledgment of one function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub id: String,
    pub name: String,
    pub response: ResponseBody,
}

impl FunctionResponse {
    pub fn new(id: impl Into<String>, name: impl Into<String>, result: ResponseResult) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            response: ResponseBody { result },
        }
    }

    /// The generic acknowledgment: `"<name> OK."`
    pub fn ok(call: &FunctionCall) -> Self {
        Self::new(
            call.id.clone(),
            call.name.clone(),
            ResponseResult::text(format!("{} OK.", call.name)),
        )
    }

    #[cfg(test)]
    pub fn result(&self) -> &ResponseResult {
        &self.response.result
    }
}

/// Batch of function responses, in request order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub function_responses: Vec<FunctionResponse>,
}

/// Messages the agent sends to the client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ServerEnvelope")]
pub enum ServerMessage {
    SetupComplete(Value),
    ToolCall(ToolCall),
    ToolCallCancellation(ToolCallCancellation),
    /// Audio/text turns; rendered by the bridge, not interpreted here
    ServerContent(Value),
}

/// Raw message object. The agent may send sibling keys such as
/// `usageMetadata` next to the one that names the message kind.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerEnvelope {
    setup_complete: Option<Value>,
    tool_call: Option<ToolCall>,
    tool_call_cancellation: Option<ToolCallCancellation>,
    server_content: Option<Value>,
}

impl TryFrom<ServerEnvelope> for ServerMessage {
    type Error = String;

    fn try_from(envelope: ServerEnvelope) -> Result<Self, Self::Error> {
        if let Some(call) = envelope.tool_call {
            Ok(ServerMessage::ToolCall(call))
        } else if let Some(cancel) = envelope.tool_call_cancellation {
            Ok(ServerMessage::ToolCallCancellation(cancel))
        } else if let Some(setup) = envelope.setup_complete {
            Ok(ServerMessage::SetupComplete(setup))
        } else if let Some(content) = envelope.server_content {
            Ok(ServerMessage::ServerContent(content))
        } else {
            Err("no recognized message kind".to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolCallCancellation {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Messages the client sends to the agent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    ClientContent(ClientContent),
    ToolResponse(ToolResponse),
}

impl ClientMessage {
    /// A complete user turn carrying `text`
    pub fn user_text(text: impl Into<String>) -> Self {
        ClientMessage::ClientContent(ClientContent {
            turns: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: text.into() }],
            }],
            turn_complete: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContent {
    pub turns: Vec<Content>,
    pub turn_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}
